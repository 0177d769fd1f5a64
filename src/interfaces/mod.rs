//! Interfaces between qbasis and the text formats of other software, plus the command-line and
//! YAML input layers.

use std::fmt;
use std::str::FromStr;

use anyhow;
use itertools::Itertools;

use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet};
use crate::error::BasisError;
use crate::io::format::qbasis_warn;

pub mod bagel;
pub mod cfour;
pub mod cli;
pub mod gamess;
pub mod gaussian94;
pub mod input;
pub mod molpro;

/// Trait for handling an input specification.
pub trait InputHandle {
    /// Handles the input section and runs appropriate conversions.
    fn handle(&self) -> Result<(), anyhow::Error>;
}

// ===========
// BasisFormat
// ===========

/// Enumerated type for the text formats in which basis sets can be encoded and decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasisFormat {
    /// Gaussian's `.gbs` layout: `****`-separated atom blocks.
    Gaussian94,

    /// GAMESS's `$DATA` layout: blank-line-separated atom blocks with indexed rows.
    Gamess,

    /// BAGEL's JSON layout.
    Bagel,

    /// CFOUR's `GENBAS` layout.
    Cfour,

    /// Molpro's `basis={...}` layout.
    Molpro,
}

impl BasisFormat {
    /// All basis formats.
    pub const ALL: [BasisFormat; 5] = [
        BasisFormat::Gaussian94,
        BasisFormat::Gamess,
        BasisFormat::Bagel,
        BasisFormat::Cfour,
        BasisFormat::Molpro,
    ];

    /// The canonical name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            BasisFormat::Gaussian94 => "gaussian94",
            BasisFormat::Gamess => "gamess",
            BasisFormat::Bagel => "bagel",
            BasisFormat::Cfour => "cfour",
            BasisFormat::Molpro => "molpro",
        }
    }

    /// The codec implementing the format.
    pub fn codec(&self) -> &'static dyn BasisCodec {
        match self {
            BasisFormat::Gaussian94 => &gaussian94::Gaussian94Codec,
            BasisFormat::Gamess => &gamess::GamessCodec,
            BasisFormat::Bagel => &bagel::BagelCodec,
            BasisFormat::Cfour => &cfour::CfourCodec,
            BasisFormat::Molpro => &molpro::MolproCodec,
        }
    }
}

impl FromStr for BasisFormat {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gaussian94" | "gaussian" | "g94" | "gbs" => Ok(BasisFormat::Gaussian94),
            "gamess" => Ok(BasisFormat::Gamess),
            "bagel" => Ok(BasisFormat::Bagel),
            "cfour" | "genbas" => Ok(BasisFormat::Cfour),
            "molpro" => Ok(BasisFormat::Molpro),
            _ => Err(BasisError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

impl fmt::Display for BasisFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =========
// EcpFormat
// =========

/// Enumerated type for the text formats in which ECP sets can be encoded and decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EcpFormat {
    Gaussian94,
    Gamess,
    Cfour,
}

impl EcpFormat {
    /// All ECP formats.
    pub const ALL: [EcpFormat; 3] = [EcpFormat::Gaussian94, EcpFormat::Gamess, EcpFormat::Cfour];

    /// The canonical name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            EcpFormat::Gaussian94 => "gaussian94",
            EcpFormat::Gamess => "gamess",
            EcpFormat::Cfour => "cfour",
        }
    }

    /// The codec implementing the format.
    pub fn codec(&self) -> &'static dyn EcpCodec {
        match self {
            EcpFormat::Gaussian94 => &gaussian94::Gaussian94Codec,
            EcpFormat::Gamess => &gamess::GamessCodec,
            EcpFormat::Cfour => &cfour::CfourCodec,
        }
    }
}

impl FromStr for EcpFormat {
    type Err = BasisError;

    /// Parses an ECP format name. Basis-only formats such as `molpro` and `bagel` are rejected
    /// with [`BasisError::UnsupportedFormat`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<BasisFormat>()? {
            BasisFormat::Gaussian94 => Ok(EcpFormat::Gaussian94),
            BasisFormat::Gamess => Ok(EcpFormat::Gamess),
            BasisFormat::Cfour => Ok(EcpFormat::Cfour),
            BasisFormat::Bagel | BasisFormat::Molpro => {
                Err(BasisError::UnsupportedFormat(s.trim().to_string()))
            }
        }
    }
}

impl fmt::Display for EcpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =================
// Trait definitions
// =================

/// Trait for encoders and decoders of basis sets in one text format.
pub trait BasisCodec: Sync {
    /// Encodes a single basis function.
    ///
    /// # Arguments
    ///
    /// * `function` - The function to be encoded.
    /// * `atom` - The symbol of the atom carrying the function, for formats that repeat it on
    /// every shell. An empty symbol is left out.
    fn encode_function(&self, function: &BasisFunction, atom: &str) -> Result<String, BasisError>;

    /// Encodes the header introducing the functions of one atom.
    fn encode_atom_header(&self, basis: &Basis) -> Result<String, BasisError>;

    /// Encodes the basis of one atom, optionally preceded by its header.
    fn encode_basis(&self, basis: &Basis, include_header: bool) -> Result<String, BasisError> {
        let header = if include_header {
            self.encode_atom_header(basis)?
        } else {
            String::new()
        };
        let functions = basis
            .iter()
            .map(|function| self.encode_function(function, basis.atom()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(header + &functions.concat())
    }

    /// Encodes a whole basis set.
    fn encode_set(&self, set: &BasisSet) -> Result<String, BasisError>;

    /// Decodes a whole basis set.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to be decoded.
    /// * `debug` - Boolean indicating if the leading lines of a malformed chunk are to be logged
    /// before the error is returned.
    fn decode_set(&self, text: &str, debug: bool) -> Result<BasisSet, BasisError>;
}

/// Trait for encoders and decoders of ECP sets in one text format.
pub trait EcpCodec: Sync {
    /// Encodes a single ECP channel belonging to an ECP with highest channel `l_max`.
    fn encode_ecp_function(&self, function: &EcpFunction, l_max: u32)
        -> Result<String, BasisError>;

    /// Encodes the ECP of one atom, header included.
    fn encode_ecp(&self, ecp: &Ecp) -> Result<String, BasisError>;

    /// Encodes a whole ECP set.
    fn encode_ecp_set(&self, set: &EcpSet) -> Result<String, BasisError>;

    /// Decodes a whole ECP set. See [`BasisCodec::decode_set`].
    fn decode_ecp_set(&self, text: &str, debug: bool) -> Result<EcpSet, BasisError>;
}

// ================
// Shared functions
// ================

/// Parses a floating-point token, accepting Fortran `D` exponent markers.
pub(crate) fn parse_float(format: &str, token: &str) -> Result<f64, BasisError> {
    token
        .trim()
        .replace(|c| c == 'D' || c == 'd', "E")
        .parse::<f64>()
        .map_err(|_| BasisError::parse(format, format!("invalid number `{}`", token.trim())))
}

/// Parses a non-negative integer token.
pub(crate) fn parse_count<T: FromStr>(format: &str, token: &str) -> Result<T, BasisError> {
    token
        .trim()
        .parse::<T>()
        .map_err(|_| BasisError::parse(format, format!("invalid count `{}`", token.trim())))
}

/// Writes the rows `[exponent, c1(, c2)]` of a function in the fixed-width layout shared by the
/// gaussian94 and gamess formats, each preceded by its 1-based index if `indexed` is set.
pub(crate) fn encode_fixed_columns(function: &BasisFunction, indexed: bool) -> String {
    let mut out = format!("{:<2}    {}\n", function.angmom().label(), function.len());
    function.rows().enumerate().for_each(|(i, row)| {
        if indexed {
            out += &format!(" {:>2} ", i + 1);
        }
        out += &format!("{:>17.7}", row[0]);
        row[1..]
            .iter()
            .for_each(|c| out += &format!(" {c:>11.7}"));
        out.push('\n');
    });
    out
}

/// Logs the location and leading lines of a decoding failure if `debug` is set, then hands the
/// error back.
pub(crate) fn report_failure(err: BasisError, debug: bool) -> BasisError {
    if debug {
        if let BasisError::Parse(parse_err) = &err {
            qbasis_warn!("{parse_err}");
            if !parse_err.context.is_empty() {
                qbasis_warn!(
                    "Offending input:\n{}",
                    parse_err.context.iter().map(|line| format!("  | {line}")).join("\n")
                );
            }
        } else {
            qbasis_warn!("{err}");
        }
    }
    err
}

/// Non-empty, non-comment lines of a chunk, trimmed. Comments start with `!`.
pub(crate) fn content_lines(chunk: &str) -> impl Iterator<Item = &str> + '_ {
    chunk
        .lines()
        .map(|line| match line.find('!') {
            Some(pos) => line[..pos].trim(),
            None => line.trim(),
        })
        .filter(|line| !line.is_empty())
}
