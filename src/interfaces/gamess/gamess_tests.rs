use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet};
use crate::error::BasisError;
use crate::interfaces::EcpFormat;

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
fn test_gamess_encode_decode_basis_set() {
    let expected = "\
H
S     2
  1         1.0000000   0.5000000
  2         2.0000000   0.5000000

C
S     2
  1         0.1000000   0.6000000
  2         0.4000000   0.4000000
SP    3
  1         0.1000000   0.2000000   0.1000000
  2         0.4000000   0.3000000   0.3000000
  3         3.0000000   0.5000000   0.6000000

";
    let bs = basis_set_hc();
    assert_eq!(bs.encode("gamess").unwrap(), expected);
    assert_eq!(BasisSet::decode(expected, "gamess").unwrap(), bs);

    // Extra blank lines and comments are tolerated.
    let loose = format!("! generated\n\n\n{}\n\n", expected.replace("C\n", "C\n! carbon\n"));
    assert_eq!(BasisSet::decode(&loose, "GAMESS").unwrap(), bs);
}

#[test]
fn test_gamess_decode_errors() {
    let missing_index = "H\nS     1\n        1.0000000   0.5000000\n";
    match BasisSet::decode(missing_index, "gamess") {
        Err(BasisError::Parse(err)) => {
            assert_eq!(err.chunk, Some(0));
            assert_eq!(err.context, vec!["H", "S     1", "1.0000000   0.5000000"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let second_block = "H\nS 1\n 1 1.0 1.0\n\nC\nP 2\n 1 1.0 1.0\n";
    match BasisSet::decode(second_block, "gamess") {
        Err(BasisError::Parse(err)) => assert_eq!(err.chunk, Some(1)),
        other => panic!("unexpected result: {other:?}"),
    }

    let huge_count = "H\nS 18446744073709551615\n 1 1.0 1.0\n";
    assert!(matches!(
        BasisSet::decode(huge_count, "gamess"),
        Err(BasisError::Parse(_))
    ));

    let bad_header = "H\nS\n 1 1.0 1.0\n";
    assert!(BasisSet::decode(bad_header, "gamess").is_err());
}

#[test]
fn test_gamess_ecp_print_decode() {
    let s = EcpFunction::from_columns("s", vec![2, 2], vec![20.0, 10.0], vec![200.0, 100.0])
        .unwrap();
    let p = EcpFunction::from_columns("p", vec![2], vec![5.5], vec![13.4]).unwrap();
    let ecp = Ecp::new("H", 1, 12, vec![s, p]).unwrap();
    let expected = "\
H-ECP GEN     12     2
2   -------  s-ul potential  ----------
      20.00000000  2       200.00000000
      10.00000000  2       100.00000000
1   -------  p-ul potential  ----------
       5.50000000  2        13.40000000
";
    assert_eq!(ecp.print("gamess").unwrap(), expected);

    let none = Ecp::new("He", 0, 0, vec![]).unwrap();
    let core_only = Ecp::new("Li", 0, 2, vec![]).unwrap();
    assert_eq!(core_only.print("gamess").unwrap(), "Li-ECP GEN      2     0\n");
    let set: EcpSet = [ecp, none, core_only].into_iter().collect();
    let text = set.encode_as(EcpFormat::Gamess).unwrap();
    assert!(text.contains("He-ECP NONE\n"));
    let decoded = EcpSet::decode(&text, "gamess").unwrap();
    assert_eq!(decoded, set);
    assert_eq!(decoded.get("H").unwrap().l_max(), 1);
    assert!(decoded.get("He").unwrap().is_empty());
    assert_eq!(decoded.get("Li").unwrap().core_electrons(), 2);

    // l_max comes from the highest channel, whatever order the channels are in.
    let native = "\
NA-ECP GEN 10 2
1 ----- d-ul potential -----
 1.0 1 -10.0
1 ----- s-ul potential -----
 2.0 0 3.0
1 ----- p-ul potential -----
 3.0 0 5.0
";
    let na = EcpSet::decode(native, "gamess").unwrap();
    assert_eq!(na.get("NA").unwrap().l_max(), 2);
    assert_eq!(na.get("NA").unwrap().len(), 3);

    let wrong_count = "H-ECP GEN 12 3\n1 --- s-ul potential ---\n 1.0 2 1.0\n";
    assert!(EcpSet::decode(wrong_count, "gamess").is_err());
}
