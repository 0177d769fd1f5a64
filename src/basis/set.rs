//! Basis sets: ordered mappings from atom symbols to per-atom bases.

use std::fmt;
use std::str::FromStr;

use indexmap::map::Values;
use indexmap::IndexMap;
use itertools::Itertools;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::basis::atom::Basis;
use crate::error::BasisError;
use crate::interfaces::BasisFormat;

#[cfg(test)]
#[path = "set_tests.rs"]
mod set_tests;

// -----------------
// AngularConvention
// -----------------

/// Enumerated type for the convention of the angular parts of the basis functions in a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngularConvention {
    /// Pure (real solid harmonic) angular functions.
    #[default]
    Spherical,

    /// Cartesian angular functions.
    Cartesian,
}

impl FromStr for AngularConvention {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spherical" | "pure" => Ok(AngularConvention::Spherical),
            "cartesian" => Ok(AngularConvention::Cartesian),
            _ => Err(BasisError::parse(
                "angular convention",
                format!("unknown angular convention `{}`", s.trim()),
            )),
        }
    }
}

impl fmt::Display for AngularConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngularConvention::Spherical => write!(f, "spherical"),
            AngularConvention::Cartesian => write!(f, "cartesian"),
        }
    }
}

// --------
// BasisSet
// --------

/// Structure containing the bases of several atoms, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct BasisSet {
    /// The per-atom bases, keyed by atom symbol.
    atoms: IndexMap<String, Basis>,

    /// The angular convention of the set.
    pub angular_convention: AngularConvention,

    /// The name of the set, usually the stem of the file it was read from.
    pub name: Option<String>,
}

impl BasisSet {
    /// Constructs an empty, unnamed, spherical [`BasisSet`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs an empty spherical [`BasisSet`] with a name.
    pub fn with_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Returns the basis of an atom.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::AtomNotFound`] if the set has no basis for `atom`.
    pub fn get(&self, atom: &str) -> Result<&Basis, BasisError> {
        self.atoms
            .get(atom)
            .ok_or_else(|| BasisError::AtomNotFound(atom.to_string()))
    }

    /// Returns the basis of an atom mutably.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::AtomNotFound`] if the set has no basis for `atom`.
    pub fn get_mut(&mut self, atom: &str) -> Result<&mut Basis, BasisError> {
        self.atoms
            .get_mut(atom)
            .ok_or_else(|| BasisError::AtomNotFound(atom.to_string()))
    }

    /// Inserts a basis keyed by its atom symbol. A basis already present for the same atom is
    /// replaced in place and returned.
    pub fn insert(&mut self, basis: Basis) -> Option<Basis> {
        self.atoms.insert(basis.atom().to_string(), basis)
    }

    /// Removes the basis of an atom, keeping the order of the remaining atoms.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::AtomNotFound`] if the set has no basis for `atom`.
    pub fn remove(&mut self, atom: &str) -> Result<Basis, BasisError> {
        self.atoms
            .shift_remove(atom)
            .ok_or_else(|| BasisError::AtomNotFound(atom.to_string()))
    }

    /// Checks if the set has a basis for `atom`.
    pub fn contains(&self, atom: &str) -> bool {
        self.atoms.contains_key(atom)
    }

    /// Iterates over the per-atom bases in insertion order.
    pub fn iter(&self) -> Values<'_, String, Basis> {
        self.atoms.values()
    }

    /// The atom symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.atoms.keys().map(String::as_str)
    }

    /// The number of atoms in the set.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Decodes a basis set from text in a named format.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] for an unknown format name, or with the
    /// error of the codec if `text` is malformed.
    pub fn decode(text: &str, format: &str) -> Result<Self, BasisError> {
        Self::decode_with(text, format, false)
    }

    /// Decodes a basis set from text in a named format, optionally logging the offending lines
    /// of malformed input.
    pub fn decode_with(text: &str, format: &str, debug: bool) -> Result<Self, BasisError> {
        Self::decode_as(text, format.parse()?, debug)
    }

    /// Decodes a basis set from text in a given format.
    pub fn decode_as(text: &str, format: BasisFormat, debug: bool) -> Result<Self, BasisError> {
        format.codec().decode_set(text, debug)
    }

    /// Encodes this basis set in a named format.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] for an unknown format name.
    pub fn encode(&self, format: &str) -> Result<String, BasisError> {
        self.encode_as(format.parse()?)
    }

    /// Encodes this basis set in a given format.
    pub fn encode_as(&self, format: BasisFormat) -> Result<String, BasisError> {
        format.codec().encode_set(self)
    }

    /// Returns a new basis set with every basis decontracted. Atom order and metadata are kept.
    pub fn decontracted(&self) -> BasisSet {
        BasisSet {
            atoms: self
                .atoms
                .iter()
                .map(|(atom, basis)| (atom.clone(), basis.decontracted()))
                .collect(),
            angular_convention: self.angular_convention,
            name: self.name.clone(),
        }
    }

    /// The primitives of every function of every atom, as arrays whose rows are
    /// `[exponent, c1(, c2)]`.
    pub fn values(&self) -> Vec<Vec<Array2<f64>>> {
        self.iter()
            .map(|basis| basis.iter().map(|function| function.values()).collect_vec())
            .collect_vec()
    }
}

impl FromIterator<Basis> for BasisSet {
    fn from_iter<I: IntoIterator<Item = Basis>>(iter: I) -> Self {
        let mut set = BasisSet::new();
        iter.into_iter().for_each(|basis| {
            set.insert(basis);
        });
        set
    }
}

impl PartialEq for BasisSet {
    /// Two basis sets are equal if they cover the same atoms with equal bases, irrespective of
    /// atom order and metadata.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.atoms.iter().all(|(atom, basis)| {
                other
                    .atoms
                    .get(atom)
                    .map(|other_basis| basis == other_basis)
                    .unwrap_or(false)
            })
    }
}

impl fmt::Display for BasisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atom_width = self.symbols().map(|atom| atom.chars().count()).max().unwrap_or(4).max(4);
        let shells = self
            .iter()
            .map(|basis| basis.iter().map(|function| function.angmom().to_string()).join(" "))
            .collect_vec();
        let shell_width = shells.iter().map(|s| s.chars().count()).max().unwrap_or(6).max(6);
        let table_width = atom_width + shell_width + 14;

        writeln!(
            f,
            "Basis set: {} ({})",
            self.name.as_deref().unwrap_or("--"),
            self.angular_convention
        )?;
        writeln!(f, "{}", "┈".repeat(table_width))?;
        writeln!(
            f,
            " {:<atom_width$}  {:>9}  {:<shell_width$}",
            "Atom", "Functions", "Shells"
        )?;
        writeln!(f, "{}", "┈".repeat(table_width))?;
        for (basis, shell_str) in self.iter().zip(shells.iter()) {
            writeln!(
                f,
                " {:<atom_width$}  {:>9}  {:<shell_width$}",
                basis.atom(),
                basis.len(),
                shell_str
            )?;
        }
        writeln!(f, "{}", "┈".repeat(table_width))?;
        Ok(())
    }
}
