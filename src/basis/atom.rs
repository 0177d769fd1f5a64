//! Per-atom collections of Gaussian basis functions.

use std::fmt;
use std::slice::Iter;

use derive_builder::Builder;
use itertools::Itertools;

use crate::basis::function::BasisFunction;
use crate::error::BasisError;
use crate::interfaces::BasisFormat;

#[cfg(test)]
#[path = "atom_tests.rs"]
mod atom_tests;

// -----
// Basis
// -----

/// Structure containing the ordered basis functions placed on one atom.
#[derive(Builder, Clone, Debug)]
pub struct Basis {
    /// The symbol of the atom carrying this basis.
    #[builder(setter(into))]
    atom: String,

    /// The basis functions, in file order.
    #[builder(default = "vec![]")]
    functions: Vec<BasisFunction>,

    /// The name of the basis, if known.
    #[builder(setter(into, strip_option), default = "None")]
    name: Option<String>,
}

impl Basis {
    /// Returns a builder to construct a new [`Basis`].
    pub fn builder() -> BasisBuilder {
        BasisBuilder::default()
    }

    /// Constructs a new unnamed [`Basis`].
    pub fn new(atom: &str, functions: Vec<BasisFunction>) -> Self {
        Self {
            atom: atom.to_string(),
            functions,
            name: None,
        }
    }

    /// The symbol of the atom carrying this basis.
    pub fn atom(&self) -> &str {
        &self.atom
    }

    /// The name of the basis, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets or clears the name of the basis.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// The basis functions, in order.
    pub fn functions(&self) -> &[BasisFunction] {
        &self.functions
    }

    /// The number of basis functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Checks if this basis holds no functions.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Returns the `i`th basis function.
    pub fn get(&self, i: usize) -> Option<&BasisFunction> {
        self.functions.get(i)
    }

    /// Replaces the `i`th basis function.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::IndexOutOfRange`] if there is no `i`th function.
    pub fn set(&mut self, i: usize, function: BasisFunction) -> Result<(), BasisError> {
        let len = self.len();
        let slot = self
            .functions
            .get_mut(i)
            .ok_or(BasisError::IndexOutOfRange { index: i, len })?;
        *slot = function;
        Ok(())
    }

    /// Inserts a basis function at position `i`, shifting later functions along.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::IndexOutOfRange`] if `i` is greater than [`Self::len`].
    pub fn insert(&mut self, i: usize, function: BasisFunction) -> Result<(), BasisError> {
        if i > self.len() {
            return Err(BasisError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        self.functions.insert(i, function);
        Ok(())
    }

    /// Appends a basis function.
    pub fn push(&mut self, function: BasisFunction) {
        self.functions.push(function);
    }

    /// Removes and returns the `i`th basis function.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::IndexOutOfRange`] if there is no `i`th function.
    pub fn remove(&mut self, i: usize) -> Result<BasisFunction, BasisError> {
        if i >= self.len() {
            return Err(BasisError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        Ok(self.functions.remove(i))
    }

    /// Iterates over the basis functions.
    pub fn iter(&self) -> Iter<'_, BasisFunction> {
        self.functions.iter()
    }

    /// Returns a new basis in which every function has been decontracted into primitives.
    /// Primitives sharing the same angular momentum and exponent are kept once, at the position
    /// they are first seen.
    pub fn decontracted(&self) -> Basis {
        let functions = self
            .functions
            .iter()
            .flat_map(|function| function.decontracted())
            .unique_by(|function| function.canonical_key())
            .collect_vec();
        Basis {
            atom: self.atom.clone(),
            functions,
            name: self.name.clone(),
        }
    }

    /// Serialises this basis in a named format.
    ///
    /// # Arguments
    ///
    /// * `format` - The name of the format.
    /// * `include_header` - Boolean indicating if the atom header of the format is to be written
    /// before the functions. Without it, the output can be embedded next to an atom in an input
    /// file.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] if no codec is known for `format`.
    pub fn print(&self, format: &str, include_header: bool) -> Result<String, BasisError> {
        self.print_as(format.parse()?, include_header)
    }

    /// Serialises this basis in a given format.
    pub fn print_as(&self, format: BasisFormat, include_header: bool) -> Result<String, BasisError> {
        format.codec().encode_basis(self, include_header)
    }
}

impl PartialEq for Basis {
    fn eq(&self, other: &Self) -> bool {
        self.functions == other.functions
    }
}

impl<'a> IntoIterator for &'a Basis {
    type Item = &'a BasisFunction;
    type IntoIter = Iter<'a, BasisFunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Basis {} {}>", self.atom, self.len())
    }
}
