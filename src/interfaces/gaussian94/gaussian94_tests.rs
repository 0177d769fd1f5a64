use std::error::Error;

use crate::basis::{AngularConvention, Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet, EcpTerm};
use crate::error::BasisError;
use crate::interfaces::EcpFormat;

fn basis_set_h() -> BasisSet {
    let h = Basis::new(
        "H",
        vec![
            BasisFunction::contracted("S", vec![1.0, 2.0], vec![0.5, 0.5]).unwrap(),
            BasisFunction::sp(vec![0.4], vec![0.3], vec![0.7]).unwrap(),
        ],
    );
    [h].into_iter().collect()
}

fn ecp_h() -> Ecp {
    let s = EcpFunction::from_columns("S", vec![2, 2], vec![20.0, 10.0], vec![200.0, 100.0])
        .unwrap();
    let p = EcpFunction::new("p", vec![EcpTerm::new(2, 5.5, 13.4)]).unwrap();
    Ecp::new("H", 2, 12, vec![s, p]).unwrap()
}

#[test]
fn test_gaussian94_encode_basis_set() {
    let expected = "\
spherical
****
H    0
S     2
        1.0000000   0.5000000
        2.0000000   0.5000000
SP    1
        0.4000000   0.3000000   0.7000000
****
";
    assert_eq!(basis_set_h().encode("gaussian94").unwrap(), expected);
    assert_eq!(
        BasisSet::decode(expected, "gaussian94").unwrap(),
        basis_set_h()
    );
}

#[test]
fn test_gaussian94_decode_exchange_style() {
    // Layout used by basis-set libraries: comments, no leading separator, scale factors and
    // Fortran exponents.
    let text = "\
! Basis set test file
!

cartesian
H     0
S   2   1.00
      0.1873113696D+02       0.3349460434D-01
      0.2825394365D+01       0.2347269535D+00
S   1   2.00
      0.25                   1.0
****
Li     0
SP   2   1.00
      0.6362897469D+01      -0.2096035800D+00       0.1877717000D+00
      0.1432060422D+01       0.1144350000D+00       0.1130590000D+01   ! trailing comment
****
";
    let bs = BasisSet::decode(text, "g94").unwrap();
    assert_eq!(bs.angular_convention, AngularConvention::Cartesian);
    assert_eq!(bs.len(), 2);

    let h = bs.get("H").unwrap();
    assert_eq!(h.len(), 2);
    assert_eq!(h.get(0).unwrap().exponents(), [18.73113696, 2.825394365]);
    assert_eq!(
        h.get(1).unwrap(),
        &BasisFunction::contracted("S", vec![1.0], vec![1.0]).unwrap()
    );

    let li = bs.get("Li").unwrap();
    assert_eq!(
        li.get(0).unwrap(),
        &BasisFunction::sp(
            vec![6.362897469, 1.432060422],
            vec![-0.20960358, 0.114435],
            vec![0.1877717, 1.13059],
        )
        .unwrap()
    );
}

#[test]
fn test_gaussian94_decode_errors() {
    let missing_rows = "****\nH    0\nS     2\n        1.0000000   0.5000000\n****\n";
    match BasisSet::decode(missing_rows, "gaussian94") {
        Err(BasisError::Parse(err)) => {
            assert_eq!(err.format, "gaussian94");
            assert_eq!(err.chunk, Some(1));
            assert_eq!(err.context[0], "H    0");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let bad_tag = "****\nH    0\nX     1\n        1.0000000   0.5000000\n****\n";
    let err = BasisSet::decode_with(bad_tag, "gaussian94", true).unwrap_err();
    assert!(matches!(
        err.source()
            .and_then(|cause| cause.downcast_ref::<BasisError>()),
        Some(BasisError::InvalidAngularMomentum(_))
    ));

    let negative = "****\nH    0\nS     1\n       -1.0000000   1.0000000\n****\n";
    match BasisSet::decode(negative, "gaussian94") {
        Err(BasisError::Parse(err)) => assert!(matches!(
            err.cause.as_deref(),
            Some(BasisError::NonPositiveExponent(_))
        )),
        other => panic!("unexpected result: {other:?}"),
    }

    let sp_one_column = "****\nH    0\nSP    1\n        1.0000000   0.5000000\n****\n";
    assert!(BasisSet::decode(sp_one_column, "gaussian94").is_err());

    let bad_header = "****\nH\nS     1\n        1.0000000   1.0000000\n****\n";
    assert!(BasisSet::decode(bad_header, "gaussian94").is_err());
}

#[test]
fn test_gaussian94_ecp_print() {
    let ecp = ecp_h();
    assert_eq!(
        ecp.functions()[0].print("gaussian94", 2).unwrap(),
        "\
s-ul potential
   2
2     20.00000000         200.00000000
2     10.00000000         100.00000000
"
    );
    assert_eq!(
        ecp.print("gaussian94").unwrap(),
        "\
H      0
H-ECP GEN     12     2
s-ul potential
   2
2     20.00000000         200.00000000
2     10.00000000         100.00000000
p-ul potential
   1
2      5.50000000          13.40000000
"
    );
}

#[test]
fn test_gaussian94_ecp_decode() {
    let set: EcpSet = [ecp_h()].into_iter().collect();
    let text = set.encode_as(EcpFormat::Gaussian94).unwrap();
    assert_eq!(EcpSet::decode(&text, "gaussian94").unwrap(), set);

    // Gaussian's own header lists l_max before the core-electron count.
    let native = "\
H 0
H-ECP 2 12
s-ul potential
2
2 20.0 200.0
2 10.0 100.0
p potential
1
2 5.5 13.4

O 0
O-ECP 1 2
s potential
1
2 3.0 4.0
";
    let decoded = EcpSet::decode(native, "gaussian94").unwrap();
    assert_eq!(decoded.get("H").unwrap(), &ecp_h());
    let o = decoded.get("O").unwrap();
    assert_eq!(o.l_max(), 1);
    assert_eq!(o.core_electrons(), 2);

    let truncated = "H 0\nH-ECP GEN 12 2\ns-ul potential\n2\n2 20.0 200.0\n";
    match EcpSet::decode(truncated, "gaussian94") {
        Err(BasisError::Parse(err)) => assert_eq!(err.chunk, Some(0)),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(EcpSet::decode("s-ul potential\n1\n2 1.0 1.0\n", "gaussian94").is_err());
    assert_eq!(
        EcpSet::decode(native, "molpro"),
        Err(BasisError::UnsupportedFormat("molpro".to_string()))
    );
}
