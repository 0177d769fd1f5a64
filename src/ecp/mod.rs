//! Effective core potentials.
//!
//! An [`Ecp`] replaces the core electrons of one atom by a set of angular-momentum channels, each
//! an [`EcpFunction`] made of `r^(power - 2) exp(-exponent r^2)` terms scaled by a coefficient.

use std::fmt;

use indexmap::map::Values;
use indexmap::IndexMap;

use crate::angmom::{AngularMomentum, ANGMOM_LABELS};
use crate::basis::function::{approx_eq, check_exponent};
use crate::error::BasisError;
use crate::interfaces::EcpFormat;


// -------
// EcpTerm
// -------

/// Structure for a single `(power, exponent, coefficient)` term of an ECP channel.
#[derive(Clone, Copy, Debug)]
pub struct EcpTerm {
    /// The power of `r` (shifted by two, following the usual convention).
    pub power: u32,

    /// The Gaussian exponent.
    pub exponent: f64,

    /// The coefficient of the term.
    pub coefficient: f64,
}

impl EcpTerm {
    /// Constructs a new [`EcpTerm`].
    pub fn new(power: u32, exponent: f64, coefficient: f64) -> Self {
        Self {
            power,
            exponent,
            coefficient,
        }
    }
}

impl PartialEq for EcpTerm {
    fn eq(&self, other: &Self) -> bool {
        self.power == other.power
            && approx_eq(self.exponent, other.exponent)
            && approx_eq(self.coefficient, other.coefficient)
    }
}

// -----------
// EcpFunction
// -----------

/// Structure for one angular-momentum channel of an ECP.
#[derive(Clone, Debug, PartialEq)]
pub struct EcpFunction {
    /// The lower-case label of the channel.
    shell: String,

    /// The terms of the channel, in file order.
    terms: Vec<EcpTerm>,
}

impl EcpFunction {
    /// Constructs a new [`EcpFunction`].
    ///
    /// # Arguments
    ///
    /// * `shell` - The angular-momentum label of the channel, in either case. `SP` is not a valid
    /// channel.
    /// * `terms` - The terms of the channel.
    ///
    /// # Errors
    ///
    /// Errors if the label is invalid, if there are no terms, or if an exponent is not positive.
    pub fn new(shell: &str, terms: Vec<EcpTerm>) -> Result<Self, BasisError> {
        let angmom = shell.parse::<AngularMomentum>()?;
        if angmom.index().is_none() {
            return Err(BasisError::InvalidAngularMomentum(shell.trim().to_string()));
        }
        if terms.is_empty() {
            return Err(BasisError::LengthMismatch {
                expected: 1,
                found: 0,
            });
        }
        terms
            .iter()
            .try_for_each(|term| check_exponent(term.exponent))?;
        Ok(Self {
            shell: angmom.label().to_lowercase(),
            terms,
        })
    }

    /// Constructs a new [`EcpFunction`] from parallel columns of powers, exponents and
    /// coefficients.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::LengthMismatch`] if the columns differ in length, and otherwise
    /// as [`Self::new`].
    pub fn from_columns(
        shell: &str,
        powers: Vec<u32>,
        exponents: Vec<f64>,
        coefficients: Vec<f64>,
    ) -> Result<Self, BasisError> {
        if let Some(len) = [exponents.len(), coefficients.len()]
            .into_iter()
            .find(|len| *len != powers.len())
        {
            return Err(BasisError::LengthMismatch {
                expected: powers.len(),
                found: len,
            });
        }
        let terms = powers
            .into_iter()
            .zip(exponents)
            .zip(coefficients)
            .map(|((power, exponent), coefficient)| EcpTerm::new(power, exponent, coefficient))
            .collect();
        Self::new(shell, terms)
    }

    /// The lower-case label of the channel.
    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// The angular momentum of the channel.
    pub fn l(&self) -> u32 {
        ANGMOM_LABELS
            .iter()
            .position(|label| label.eq_ignore_ascii_case(&self.shell))
            .map(|l| l as u32)
            .unwrap_or_default()
    }

    /// The terms of the channel.
    pub fn terms(&self) -> &[EcpTerm] {
        &self.terms
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always `false`, since a validated channel has at least one term.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Serialises this channel on its own in a named format. Only the cfour layout depends on
    /// `l_max`, through the label of the channel header.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] if no ECP codec is known for `format`.
    pub fn print(&self, format: &str, l_max: u32) -> Result<String, BasisError> {
        self.print_as(format.parse()?, l_max)
    }

    /// Serialises this channel on its own in a given format.
    pub fn print_as(&self, format: EcpFormat, l_max: u32) -> Result<String, BasisError> {
        format.codec().encode_ecp_function(self, l_max)
    }
}

impl fmt::Display for EcpFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<EcpFunction {} {}>", self.shell, self.len())
    }
}

// ---
// Ecp
// ---

/// Structure for the effective core potential of one atom.
#[derive(Clone, Debug)]
pub struct Ecp {
    /// The symbol of the atom.
    atom: String,

    /// The highest angular momentum channel.
    l_max: u32,

    /// The number of core electrons replaced by the potential.
    core_electrons: u32,

    /// The channels, in file order.
    functions: Vec<EcpFunction>,
}

impl Ecp {
    /// Constructs a new [`Ecp`].
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::InvalidAngularMomentum`] if `l_max` lies beyond the label
    /// alphabet.
    pub fn new(
        atom: &str,
        l_max: u32,
        core_electrons: u32,
        functions: Vec<EcpFunction>,
    ) -> Result<Self, BasisError> {
        AngularMomentum::from_index(l_max)?;
        Ok(Self {
            atom: atom.to_string(),
            l_max,
            core_electrons,
            functions,
        })
    }

    /// The symbol of the atom.
    pub fn atom(&self) -> &str {
        &self.atom
    }

    /// The highest angular momentum channel.
    pub fn l_max(&self) -> u32 {
        self.l_max
    }

    /// The number of core electrons replaced by the potential.
    pub fn core_electrons(&self) -> u32 {
        self.core_electrons
    }

    /// The channels, in file order.
    pub fn functions(&self) -> &[EcpFunction] {
        &self.functions
    }

    /// The number of channels.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the potential has no channels, as for a core-only or absent ECP.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterates over the channels.
    pub fn iter(&self) -> std::slice::Iter<'_, EcpFunction> {
        self.functions.iter()
    }

    /// Serialises this ECP, atom header included, in a named format.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] if no ECP codec is known for `format`.
    pub fn print(&self, format: &str) -> Result<String, BasisError> {
        self.print_as(format.parse()?)
    }

    /// Serialises this ECP, atom header included, in a given format.
    pub fn print_as(&self, format: EcpFormat) -> Result<String, BasisError> {
        format.codec().encode_ecp(self)
    }
}

impl PartialEq for Ecp {
    fn eq(&self, other: &Self) -> bool {
        self.l_max == other.l_max
            && self.core_electrons == other.core_electrons
            && self.functions == other.functions
    }
}

impl fmt::Display for Ecp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Ecp {} core={} lmax={} {}>",
            self.atom,
            self.core_electrons,
            self.l_max,
            self.len()
        )
    }
}

// ------
// EcpSet
// ------

/// Structure containing the ECPs of several atoms, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct EcpSet {
    /// The per-atom ECPs, keyed by atom symbol.
    atoms: IndexMap<String, Ecp>,

    /// The name of the set, usually the stem of the file it was read from.
    pub name: Option<String>,
}

impl EcpSet {
    /// Constructs an empty, unnamed [`EcpSet`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ECP of an atom.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::AtomNotFound`] if the set has no ECP for `atom`.
    pub fn get(&self, atom: &str) -> Result<&Ecp, BasisError> {
        self.atoms
            .get(atom)
            .ok_or_else(|| BasisError::AtomNotFound(atom.to_string()))
    }

    /// Returns the ECP of an atom mutably.
    pub fn get_mut(&mut self, atom: &str) -> Result<&mut Ecp, BasisError> {
        self.atoms
            .get_mut(atom)
            .ok_or_else(|| BasisError::AtomNotFound(atom.to_string()))
    }

    /// Inserts an ECP keyed by its atom symbol, returning any ECP it replaces.
    pub fn insert(&mut self, ecp: Ecp) -> Option<Ecp> {
        self.atoms.insert(ecp.atom().to_string(), ecp)
    }

    /// Removes the ECP of an atom, keeping the order of the remaining atoms.
    pub fn remove(&mut self, atom: &str) -> Result<Ecp, BasisError> {
        self.atoms
            .shift_remove(atom)
            .ok_or_else(|| BasisError::AtomNotFound(atom.to_string()))
    }

    /// Whether the set holds an ECP for `atom`.
    pub fn contains(&self, atom: &str) -> bool {
        self.atoms.contains_key(atom)
    }

    /// Iterates over the ECPs in insertion order.
    pub fn iter(&self) -> Values<'_, String, Ecp> {
        self.atoms.values()
    }

    /// Iterates over the atom symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.atoms.keys().map(String::as_str)
    }

    /// The number of atoms with an ECP.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the set holds no ECP.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Decodes an ECP set from text in a named format.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] for an unknown (or molpro) format name, or
    /// with the error of the codec if `text` is malformed.
    pub fn decode(text: &str, format: &str) -> Result<Self, BasisError> {
        Self::decode_with(text, format, false)
    }

    /// Decodes an ECP set from text in a named format, optionally logging the offending lines of
    /// malformed input.
    pub fn decode_with(text: &str, format: &str, debug: bool) -> Result<Self, BasisError> {
        Self::decode_as(text, format.parse()?, debug)
    }

    /// Decodes an ECP set from text in a given format.
    pub fn decode_as(text: &str, format: EcpFormat, debug: bool) -> Result<Self, BasisError> {
        format.codec().decode_ecp_set(text, debug)
    }

    /// Encodes this ECP set in a named format.
    pub fn encode(&self, format: &str) -> Result<String, BasisError> {
        self.encode_as(format.parse()?)
    }

    /// Encodes this ECP set in a given format.
    pub fn encode_as(&self, format: EcpFormat) -> Result<String, BasisError> {
        format.codec().encode_ecp_set(self)
    }
}

impl FromIterator<Ecp> for EcpSet {
    fn from_iter<I: IntoIterator<Item = Ecp>>(iter: I) -> Self {
        let mut set = EcpSet::new();
        iter.into_iter().for_each(|ecp| {
            set.insert(ecp);
        });
        set
    }
}

impl PartialEq for EcpSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.atoms.iter().all(|(atom, ecp)| {
                other
                    .atoms
                    .get(atom)
                    .map(|other_ecp| ecp == other_ecp)
                    .unwrap_or(false)
            })
    }
}

impl fmt::Display for EcpSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ECP set: {}", self.name.as_deref().unwrap_or("--"))?;
        writeln!(f, "{}", "┈".repeat(40))?;
        writeln!(f, " {:<6}  {:>5}  {:>5}  {:>8}", "Atom", "Core", "l_max", "Channels")?;
        writeln!(f, "{}", "┈".repeat(40))?;
        for ecp in self.iter() {
            writeln!(
                f,
                " {:<6}  {:>5}  {:>5}  {:>8}",
                ecp.atom(),
                ecp.core_electrons(),
                ecp.l_max(),
                ecp.len()
            )?;
        }
        writeln!(f, "{}", "┈".repeat(40))?;
        Ok(())
    }
}
