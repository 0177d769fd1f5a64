use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet};
use crate::error::BasisError;
use crate::interfaces::{BasisFormat, EcpFormat};

fn basis_set_hc() -> BasisSet {
    let h = Basis::new(
        "H",
        vec![BasisFunction::contracted("S", vec![1.0, 2.0], vec![0.5, 0.5]).unwrap()],
    );
    let c = Basis::new(
        "C",
        vec![
            BasisFunction::contracted("S", vec![0.1, 0.4], vec![0.6, 0.4]).unwrap(),
            BasisFunction::sp(vec![0.1, 0.4, 3.0], vec![0.2, 0.3, 0.5], vec![0.1, 0.3, 0.6])
                .unwrap(),
        ],
    );
    [h, c].into_iter().collect()
}

#[test]
fn test_cfour_encode_basis_set() {
    let mut bs: BasisSet = basis_set_hc().iter().take(1).cloned().collect();
    bs.name = Some("cc pvdz".to_string());
    let expected = "\
H:CC_PVDZ
CC_PVDZ

  1
    0
    1
    2

      1.0000000000      2.0000000000

      0.5000000000
      0.5000000000

";
    assert_eq!(bs.encode("cfour").unwrap(), expected);
    assert_eq!(BasisSet::decode(expected, "genbas").unwrap(), bs);

    // Unnamed sets fall back on a default name.
    let text = basis_set_hc().encode_as(BasisFormat::Cfour).unwrap();
    assert!(text.starts_with("H:QBASIS\nQBASIS\n"));
    assert!(text.contains("C:QBASIS\nQBASIS\n\n  3\n    0    0    1\n    1    1    1\n    2    3    3\n"));
}

#[test]
fn test_cfour_sp_round_trip() {
    let bs = basis_set_hc();
    let text = bs.encode("cfour").unwrap();
    let decoded = BasisSet::decode(&text, "cfour").unwrap();
    assert_eq!(decoded, bs);
    assert_eq!(decoded.get("C").unwrap().len(), 2);
    assert_eq!(decoded.get("C").unwrap().name(), Some("QBASIS"));
}

#[test]
fn test_cfour_decode_general_contraction() {
    let genbas = "\
O:TEST-BASIS
generally contracted: two d functions

  1
    2
    2
    3

  1.5D+00  0.3D+00  0.05

  0.6 0.0
  0.4 0.5
  0.0 0.5

";
    let bs = BasisSet::decode(genbas, "cfour").unwrap();
    let o = bs.get("O").unwrap();
    assert_eq!(o.name(), Some("TEST-BASIS"));
    assert_eq!(
        o,
        &Basis::new(
            "O",
            vec![
                BasisFunction::contracted("D", vec![1.5, 0.3, 0.05], vec![0.6, 0.4, 0.0])
                    .unwrap(),
                BasisFunction::contracted("D", vec![1.5, 0.3, 0.05], vec![0.0, 0.5, 0.5])
                    .unwrap(),
            ]
        )
    );
}

#[test]
fn test_cfour_decode_errors() {
    let short = "H:SHORT\ncomment\n\n  1\n    0\n    1\n    3\n\n 1.0 2.0\n\n 0.5\n 0.5\n";
    match BasisSet::decode(short, "cfour") {
        Err(BasisError::CountMismatch {
            atom,
            expected,
            found,
            ..
        }) => {
            assert_eq!(atom, "H");
            assert_eq!(expected, 10);
            assert_eq!(found, 8);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // Declared counts too large to multiply out are rejected rather than wrapped.
    let huge_exponents = "H:X\ncomment\n\n1\n0\n2\n18446744073709551615\n";
    assert!(matches!(
        BasisSet::decode(huge_exponents, "cfour"),
        Err(BasisError::CountMismatch { expected: usize::MAX, found: 4, .. })
    ));
    let huge_shells = "H:X\ncomment\n\n18446744073709551615\n0\n";
    assert!(matches!(
        BasisSet::decode(huge_shells, "cfour"),
        Err(BasisError::CountMismatch { expected: usize::MAX, found: 2, .. })
    ));

    let no_header = "  1\n    0\n";
    assert!(matches!(
        BasisSet::decode(no_header, "cfour"),
        Err(BasisError::Parse(_))
    ));

    let bad_number = "H:BAD\ncomment\n  1\n    0\n    1\n    1\n  one\n  1.0\n";
    match BasisSet::decode(bad_number, "cfour") {
        Err(BasisError::Parse(err)) => {
            assert_eq!(err.chunk, Some(0));
            assert_eq!(err.context[0], "H:BAD");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_cfour_ecp_print_decode() {
    let s = EcpFunction::from_columns("s", vec![2, 2], vec![20.0, 10.0], vec![200.0, 100.0])
        .unwrap();
    let p = EcpFunction::from_columns("p", vec![2], vec![5.5], vec![13.4]).unwrap();
    let ecp = Ecp::new("H", 2, 12, vec![s, p]).unwrap();
    let expected = "\
*
H:ECP-12
*
    NCORE = 12     LMAX =2
s-f
  200.00000000    2   20.00000000
  100.00000000    2   10.00000000
p-f
   13.40000000    2    5.50000000
*
";
    assert_eq!(ecp.print("cfour").unwrap(), expected);

    let o = Ecp::new(
        "O",
        1,
        2,
        vec![EcpFunction::from_columns("s", vec![1], vec![3.0], vec![-1.5]).unwrap()],
    )
    .unwrap();
    let set: EcpSet = [ecp, o].into_iter().collect();
    let text = set.encode_as(EcpFormat::Cfour).unwrap();
    let decoded = EcpSet::decode(&text, "cfour").unwrap();
    assert_eq!(decoded, set);
    assert_eq!(decoded.get("H").unwrap().core_electrons(), 12);
    assert_eq!(decoded.get("O").unwrap().functions()[0].terms()[0].coefficient, -1.5);

    let truncated = "*\nH:ECP-12\n*\n    NCORE = 12     LMAX =2\ns-f\n  1.0 2 1.0\n";
    match EcpSet::decode(truncated, "cfour") {
        Err(BasisError::Parse(err)) => assert_eq!(err.chunk, Some(0)),
        other => panic!("unexpected result: {other:?}"),
    }

    let orphan_term = "*\nH:ECP-2\n*\nNCORE = 2 LMAX = 0\n  1.0 2 1.0\n*\n";
    assert!(EcpSet::decode(orphan_term, "cfour").is_err());
}
