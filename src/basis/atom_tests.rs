use crate::basis::{Basis, BasisFunction};
use crate::error::BasisError;

fn basis_c() -> Basis {
    let bfs = BasisFunction::contracted("S", vec![1.0, 2.0], vec![0.5, 0.5]).unwrap();
    let bfp = BasisFunction::contracted("P", vec![0.01, 0.2, 1.0], vec![0.3, 0.4, 0.3]).unwrap();
    let bfsp = BasisFunction::sp(
        vec![0.1, 0.4, 3.0],
        vec![0.2, 0.3, 0.5],
        vec![0.1, 0.3, 0.6],
    )
    .unwrap();
    Basis::new("C", vec![bfs, bfp, bfsp])
}

#[test]
fn test_basis_len_get_set_remove_eq() {
    let mut basis = basis_c();
    assert_eq!(basis.len(), 3);
    assert_eq!(basis.atom(), "C");
    assert!(basis.name().is_none());

    let bff = BasisFunction::contracted("F", vec![4.0, 9.0], vec![0.1, 0.9]).unwrap();
    basis.set(0, bff.clone()).unwrap();
    assert_eq!(basis.get(0), Some(&bff));
    assert_eq!(
        basis.set(3, bff.clone()),
        Err(BasisError::IndexOutOfRange { index: 3, len: 3 })
    );

    let removed = basis.remove(0).unwrap();
    assert_eq!(removed, bff);
    assert_eq!(basis.len(), 2);
    assert!(basis.remove(2).is_err());

    basis.insert(2, bff.clone()).unwrap();
    assert_eq!(basis.get(2), Some(&bff));
    assert!(basis.insert(5, bff.clone()).is_err());

    let bfsp = basis_c().get(2).cloned().unwrap();
    let basis_1 = Basis::new("C", vec![bfsp.clone()]);
    let basis_2 = Basis::builder()
        .atom("C")
        .functions(vec![bfsp])
        .name("simple")
        .build()
        .unwrap();
    assert_eq!(basis_1, basis_2);
    assert_eq!(basis_2.name(), Some("simple"));
    assert_ne!(basis_1, basis_c());
}

#[test]
fn test_basis_display_print() {
    let c_gamess = "\
C
S     2
  1         1.0000000   0.5000000
  2         2.0000000   0.5000000
P     3
  1         0.0100000   0.3000000
  2         0.2000000   0.4000000
  3         1.0000000   0.3000000
SP    3
  1         0.1000000   0.2000000   0.1000000
  2         0.4000000   0.3000000   0.3000000
  3         3.0000000   0.5000000   0.6000000
";
    let c_gaussian94 = "\
C    0
S     2
        1.0000000   0.5000000
        2.0000000   0.5000000
P     3
        0.0100000   0.3000000
        0.2000000   0.4000000
        1.0000000   0.3000000
SP    3
        0.1000000   0.2000000   0.1000000
        0.4000000   0.3000000   0.3000000
        3.0000000   0.5000000   0.6000000
";
    let basis = basis_c();
    assert_eq!(basis.to_string(), "<Basis C 3>");
    assert_eq!(basis.print("gaussian94", true).unwrap(), c_gaussian94);
    assert_eq!(basis.print("gamess", true).unwrap(), c_gamess);

    // Without the header, only the functions are written.
    let headless = basis.print("gaussian94", false).unwrap();
    assert_eq!(headless, c_gaussian94.trim_start_matches("C    0\n"));
    assert!(matches!(
        basis.print("turbomole", true),
        Err(BasisError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_basis_decontracted() {
    let basis = basis_c();

    // S and P parts of the SP function are split upon decontraction.
    let decon = basis.decontracted();
    assert_eq!(decon.len(), 11);
    assert_eq!(decon.atom(), "C");
    assert!(decon.iter().all(|f| f.len() == 1));

    // Duplicates are removed.
    let doubled = Basis::new(
        "C",
        basis.iter().chain(basis.iter()).cloned().collect(),
    );
    assert_eq!(doubled.decontracted(), decon);

    let s = Basis::new(
        "H",
        vec![
            BasisFunction::contracted("S", vec![1.0, 2.0], vec![0.5, 0.5]).unwrap(),
            BasisFunction::contracted("S", vec![2.0, 1.0], vec![0.3, 0.7]).unwrap(),
        ],
    );
    assert_eq!(
        s.decontracted().functions(),
        [
            BasisFunction::contracted("S", vec![1.0], vec![1.0]).unwrap(),
            BasisFunction::contracted("S", vec![2.0], vec![1.0]).unwrap(),
        ]
    );

    // Idempotent
    assert_eq!(decon.decontracted(), decon);
}
