use crate::angmom::{lower_label, AngularMomentum, ANGMOM_INDICES, ANGMOM_LABELS};
use crate::error::BasisError;

#[test]
fn test_angmom_labels_indices() {
    for (i, label) in ANGMOM_LABELS.iter().enumerate() {
        assert_eq!(ANGMOM_INDICES.get(label).copied(), Some(i as u32));
    }
    assert!(ANGMOM_INDICES.get("J").is_none());
}

#[test]
fn test_angmom_from_str() {
    assert_eq!("s".parse::<AngularMomentum>(), Ok(AngularMomentum::Single(0)));
    assert_eq!("F".parse::<AngularMomentum>(), Ok(AngularMomentum::Single(3)));
    assert_eq!("L".parse::<AngularMomentum>(), Ok(AngularMomentum::Single(8)));
    assert_eq!("Sp".parse::<AngularMomentum>(), Ok(AngularMomentum::SP));
    assert_eq!(
        "X".parse::<AngularMomentum>(),
        Err(BasisError::InvalidAngularMomentum("X".to_string()))
    );
    assert!("J".parse::<AngularMomentum>().is_err());
    assert!("".parse::<AngularMomentum>().is_err());
}

#[test]
fn test_angmom_properties() {
    let d = AngularMomentum::Single(2);
    assert_eq!(d.index(), Some(2));
    assert_eq!(d.label(), "D");
    assert_eq!(d.n_coefficient_columns(), 1);
    assert_eq!(d.components(), vec![d]);

    let sp = AngularMomentum::SP;
    assert_eq!(sp.index(), None);
    assert_eq!(sp.to_string(), "SP");
    assert_eq!(sp.n_coefficient_columns(), 2);
    assert_eq!(
        sp.components(),
        vec![AngularMomentum::Single(0), AngularMomentum::Single(1)]
    );

    assert!(AngularMomentum::from_index(10).is_ok());
    assert!(AngularMomentum::from_index(11).is_err());
    assert_eq!(lower_label(3).unwrap(), "f");
    assert_eq!(AngularMomentum::Single(42).label(), "?");
}
