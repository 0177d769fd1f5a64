use proptest::prelude::*;

use qbasis::angmom::{lower_label, AngularMomentum};
use qbasis::basis::{Basis, BasisFunction, BasisSet};
use qbasis::ecp::{Ecp, EcpFunction, EcpSet};
use qbasis::interfaces::{BasisFormat, EcpFormat};
use qbasis::io::{read_basis_set, read_ecp_set};

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

const ATOMS: [&str; 8] = ["H", "He", "C", "N", "O", "Na", "Cl", "Fe"];

// Values are drawn from grids that every format writes without loss.

fn exponents(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..=1_000_000, n)
        .prop_map(|xs| xs.into_iter().map(|x| f64::from(x) / 1.0e4).collect())
}

fn coefficients(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000_000i32..=1_000_000, n)
        .prop_map(|xs| xs.into_iter().map(|x| f64::from(x) / 1.0e6).collect())
}

fn basis_function() -> impl Strategy<Value = BasisFunction> {
    (prop::sample::select(vec!["S", "P", "D", "F", "SP"]), 1usize..=4)
        .prop_flat_map(|(tag, n)| (Just(tag), exponents(n), coefficients(n), coefficients(n)))
        .prop_map(|(tag, exps, c1, c2)| {
            if tag == "SP" {
                BasisFunction::sp(exps, c1, c2).unwrap()
            } else {
                BasisFunction::contracted(tag, exps, c1).unwrap()
            }
        })
}

fn basis_set() -> impl Strategy<Value = BasisSet> {
    prop::sample::subsequence(ATOMS.to_vec(), 1..=4)
        .prop_flat_map(|atoms| {
            let n = atoms.len();
            (
                Just(atoms),
                prop::collection::vec(prop::collection::vec(basis_function(), 1..=4), n),
            )
        })
        .prop_map(|(atoms, functions)| {
            atoms
                .into_iter()
                .zip(functions)
                .map(|(atom, functions)| Basis::new(atom, functions))
                .collect()
        })
}

fn ecp_function(l: u32) -> impl Strategy<Value = EcpFunction> {
    (1usize..=3)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0u32..=2, n),
                exponents(n),
                prop::collection::vec(-1_000_000i32..=1_000_000, n),
            )
        })
        .prop_map(move |(powers, exps, coefs)| {
            EcpFunction::from_columns(
                &lower_label(l).unwrap(),
                powers,
                exps,
                coefs.into_iter().map(|c| f64::from(c) / 1.0e4).collect(),
            )
            .unwrap()
        })
}

/// ECPs with channels `0..=l_max`, the local `l_max` channel first as in published potentials.
fn ecp(atom: &'static str) -> impl Strategy<Value = Ecp> {
    (0u32..=3, 0u32..=60)
        .prop_flat_map(|(l_max, core)| {
            let channels = std::iter::once(l_max)
                .chain(0..l_max)
                .map(ecp_function)
                .collect::<Vec<_>>();
            (Just(l_max), Just(core), channels)
        })
        .prop_map(move |(l_max, core, functions)| Ecp::new(atom, l_max, core, functions).unwrap())
}

fn ecp_set() -> impl Strategy<Value = EcpSet> {
    prop::sample::subsequence(ATOMS.to_vec(), 1..=4)
        .prop_flat_map(|atoms| atoms.into_iter().map(ecp).collect::<Vec<_>>())
        .prop_map(|ecps| ecps.into_iter().collect())
}

/// Whether a basis holds an S function directly followed by a P function on the same exponents,
/// which the cfour layout cannot tell apart from an `SP` function.
fn has_cfour_sp_pair(set: &BasisSet) -> bool {
    set.iter().any(|basis| {
        basis.functions().windows(2).any(|pair| {
            pair[0].angmom() == AngularMomentum::Single(0)
                && pair[1].angmom() == AngularMomentum::Single(1)
                && pair[0].exponents() == pair[1].exponents()
        })
    })
}

proptest! {
    #[test]
    fn test_basis_set_round_trip(set in basis_set()) {
        for format in BasisFormat::ALL {
            if format == BasisFormat::Cfour && has_cfour_sp_pair(&set) {
                continue;
            }
            let text = set.encode_as(format).unwrap();
            let decoded = BasisSet::decode_as(&text, format, false).unwrap();
            prop_assert_eq!(&decoded, &set, "format {}", format);
            prop_assert_eq!(decoded.symbols().collect::<Vec<_>>(), set.symbols().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_ecp_set_round_trip(set in ecp_set()) {
        for format in EcpFormat::ALL {
            let text = set.encode_as(format).unwrap();
            let decoded = EcpSet::decode_as(&text, format, false).unwrap();
            prop_assert_eq!(&decoded, &set, "format {}", format);
        }
    }

    #[test]
    fn test_decontraction_idempotent(set in basis_set()) {
        let once = set.decontracted();
        prop_assert_eq!(&once.decontracted(), &once);
        for basis in once.iter() {
            for function in basis.iter() {
                prop_assert_eq!(function.len(), 1);
                prop_assert!(function.coefficients().iter().all(|col| col == &vec![1.0]));
            }
        }
    }
}

#[test]
fn test_cross_format_chain() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = format!("{ROOT}/tests/basis_sets/sto-3g.gbs");
    let source = read_basis_set(&path, BasisFormat::Gaussian94, true).unwrap();
    let mut set = source.clone();
    for format in [
        BasisFormat::Bagel,
        BasisFormat::Molpro,
        BasisFormat::Cfour,
        BasisFormat::Gamess,
        BasisFormat::Gaussian94,
    ] {
        let text = set.encode_as(format).unwrap();
        set = BasisSet::decode_as(&text, format, true).unwrap();
    }
    assert_eq!(set, source);
    assert_eq!(
        set.get("C").unwrap().functions()[1].angmom(),
        AngularMomentum::SP
    );
}

#[test]
fn test_ecp_cross_format_chain() {
    let path = format!("{ROOT}/tests/basis_sets/lanl2dz.ecp.gbs");
    let source = read_ecp_set(&path, EcpFormat::Gaussian94, true).unwrap();
    let cfour = source.encode_as(EcpFormat::Cfour).unwrap();
    let back = EcpSet::decode_as(&cfour, EcpFormat::Cfour, true).unwrap();
    assert_eq!(back, source);

    let gamess = source.encode_as(EcpFormat::Gamess).unwrap();
    let from_gamess = EcpSet::decode_as(&gamess, EcpFormat::Gamess, true).unwrap();
    assert_eq!(from_gamess, source);
    let na = from_gamess.get("NA").unwrap();
    assert_eq!(na.l_max(), 2);
    assert_eq!(na.core_electrons(), 10);

    // The l_max read back from gamess survives onwards into cfour.
    let cfour = from_gamess.encode_as(EcpFormat::Cfour).unwrap();
    assert!(cfour.contains("    NCORE = 10     LMAX =2\n"));
    assert!(cfour.contains("d-f"));
    assert_eq!(EcpSet::decode(&cfour, "cfour").unwrap(), source);
}

#[test]
fn test_cfour_merges_s_and_p_on_shared_exponents() {
    let s = BasisFunction::contracted("S", vec![1.0, 0.5], vec![0.3, 0.7]).unwrap();
    let p = BasisFunction::contracted("P", vec![1.0, 0.5], vec![0.4, 0.6]).unwrap();
    let set: BasisSet = [Basis::new("C", vec![s, p])].into_iter().collect();
    let decoded = BasisSet::decode(&set.encode("cfour").unwrap(), "cfour").unwrap();
    let c = decoded.get("C").unwrap();
    assert_eq!(c.len(), 1);
    assert_eq!(
        c.functions()[0],
        BasisFunction::sp(vec![1.0, 0.5], vec![0.3, 0.7], vec![0.4, 0.6]).unwrap()
    );
}

#[test]
fn test_debug_decode_failure() {
    let _ = env_logger::builder().is_test(true).try_init();
    let malformed = "****\nH     0\nS   2   1.00\n      1.0000000   0.5000000\n****\n";
    let err = BasisSet::decode_with(malformed, "gaussian94", true).unwrap_err();
    assert!(err.to_string().contains("chunk 1"));
}
