//! Angular-momentum labels of Gaussian shells.

use std::fmt;
use std::str::FromStr;

use phf::phf_map;

use crate::error::BasisError;

#[cfg(test)]
#[path = "angmom_tests.rs"]
mod angmom_tests;

/// Alphabetical labels of angular momenta. The letter `J` is skipped by convention.
pub static ANGMOM_LABELS: [&str; 11] = ["S", "P", "D", "F", "G", "H", "I", "K", "L", "M", "N"];

/// Indices of alphabetical labels of angular momenta.
pub static ANGMOM_INDICES: phf::Map<&'static str, u32> = phf_map! {
    "S" => 0,
    "P" => 1,
    "D" => 2,
    "F" => 3,
    "G" => 4,
    "H" => 5,
    "I" => 6,
    "K" => 7,
    "L" => 8,
    "M" => 9,
    "N" => 10,
};

// ---------------
// AngularMomentum
// ---------------

/// Enumerated type for the angular-momentum tag of a basis function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AngularMomentum {
    /// A single angular momentum, identified by its index in [`ANGMOM_LABELS`].
    Single(u32),

    /// A shared-exponent S+P shell carrying two independently scaled coefficient columns.
    SP,
}

impl AngularMomentum {
    /// Constructs a single angular momentum from its numeric index.
    ///
    /// # Errors
    ///
    /// Errors if `l` lies beyond the label alphabet.
    pub fn from_index(l: u32) -> Result<Self, BasisError> {
        if (l as usize) < ANGMOM_LABELS.len() {
            Ok(AngularMomentum::Single(l))
        } else {
            Err(BasisError::InvalidAngularMomentum(l.to_string()))
        }
    }

    /// The numeric index of a single angular momentum, or `None` for the composite `SP`.
    pub fn index(&self) -> Option<u32> {
        match self {
            AngularMomentum::Single(l) => Some(*l),
            AngularMomentum::SP => None,
        }
    }

    /// The upper-case label of this angular momentum, or `"?"` for an index beyond the label
    /// alphabet.
    pub fn label(&self) -> &'static str {
        match self {
            AngularMomentum::Single(l) => usize::try_from(*l)
                .ok()
                .and_then(|i| ANGMOM_LABELS.get(i))
                .copied()
                .unwrap_or("?"),
            AngularMomentum::SP => "SP",
        }
    }

    /// The number of coefficient columns a function with this angular momentum carries.
    pub fn n_coefficient_columns(&self) -> usize {
        match self {
            AngularMomentum::Single(_) => 1,
            AngularMomentum::SP => 2,
        }
    }

    /// The single angular momenta making up this tag, in coefficient-column order.
    pub fn components(&self) -> Vec<AngularMomentum> {
        match self {
            AngularMomentum::Single(_) => vec![*self],
            AngularMomentum::SP => vec![AngularMomentum::Single(0), AngularMomentum::Single(1)],
        }
    }
}

impl FromStr for AngularMomentum {
    type Err = BasisError;

    /// Parses an angular-momentum label case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_uppercase();
        if label == "SP" {
            return Ok(AngularMomentum::SP);
        }
        ANGMOM_INDICES
            .get(label.as_str())
            .map(|l| AngularMomentum::Single(*l))
            .ok_or_else(|| BasisError::InvalidAngularMomentum(s.trim().to_string()))
    }
}

impl fmt::Display for AngularMomentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returns the lower-case label of the angular momentum `l`, as used for ECP shells.
///
/// # Errors
///
/// Errors if `l` lies beyond the label alphabet.
pub fn lower_label(l: u32) -> Result<String, BasisError> {
    AngularMomentum::from_index(l).map(|am| am.label().to_lowercase())
}
