//! Conversion of basis-set and ECP files between formats.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, bail, format_err};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::basis::BasisSet;
use crate::drivers::QBasisDriver;
use crate::ecp::EcpSet;
use crate::interfaces::{BasisFormat, EcpFormat};
use crate::io::format::{
    log_subtitle, log_title, nice_bool, qbasis_output, qbasis_warn, QBasisOutput,
};
use crate::io::{read_basis_set, read_ecp_set, write_basis_set, write_ecp_set};


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// An enumerated type for the kind of set held by the files being converted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionKind {
    /// Variant for orbital basis sets.
    #[default]
    Basis,

    /// Variant for effective core potentials.
    Ecp,
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionKind::Basis => write!(f, "basis set"),
            ConversionKind::Ecp => write!(f, "ECP"),
        }
    }
}

/// A structure containing control parameters for the conversion of one file.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ConversionParams {
    /// The kind of set held by the source file.
    #[builder(default = "ConversionKind::Basis")]
    #[serde(default)]
    pub kind: ConversionKind,

    /// The path of the file to be converted.
    #[builder(setter(into))]
    pub source: PathBuf,

    /// The name of the format of the source file.
    #[builder(setter(into))]
    pub source_format: String,

    /// The path of the file to be written. If `None`, the converted text is written to the
    /// output log instead.
    #[builder(setter(into, strip_option), default = "None")]
    #[serde(default)]
    pub target: Option<PathBuf>,

    /// The name of the format to convert to.
    #[builder(setter(into))]
    pub target_format: String,

    /// Boolean indicating if every contracted function of a basis set is to be replaced by its
    /// unique primitives before writing.
    #[builder(default = "false")]
    #[serde(default)]
    pub decontract: bool,

    /// Boolean indicating if a malformed chunk of the source file is to be logged before the
    /// conversion fails.
    #[builder(default = "false")]
    #[serde(default)]
    pub debug: bool,
}

impl ConversionParams {
    /// Returns a builder to construct a [`ConversionParams`] structure.
    pub fn builder() -> ConversionParamsBuilder {
        ConversionParamsBuilder::default()
    }
}

impl fmt::Display for ConversionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Set kind: {}", self.kind)?;
        writeln!(
            f,
            "Source: {} ({})",
            self.source.display(),
            self.source_format
        )?;
        writeln!(
            f,
            "Target: {} ({})",
            self.target
                .as_ref()
                .map(|target| target.display().to_string())
                .unwrap_or_else(|| "output log".to_string()),
            self.target_format
        )?;
        if self.kind == ConversionKind::Basis {
            writeln!(f, "Decontract: {}", nice_bool(self.decontract))?;
        }
        writeln!(f, "Log malformed input: {}", nice_bool(self.debug))?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// An enumerated type for the set produced by a conversion.
#[derive(Clone, Debug, PartialEq)]
pub enum ConvertedSet {
    Basis(BasisSet),
    Ecp(EcpSet),
}

impl fmt::Display for ConvertedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertedSet::Basis(set) => write!(f, "{set}"),
            ConvertedSet::Ecp(set) => write!(f, "{set}"),
        }
    }
}

/// A structure to contain conversion results.
#[derive(Clone, Builder, Debug)]
pub struct ConversionResult {
    /// The control parameters used to obtain this result.
    pub parameters: ConversionParams,

    /// The set as written, after any decontraction.
    pub set: ConvertedSet,

    /// The encoded text, kept only when no target file was requested.
    #[builder(default = "None")]
    pub text: Option<String>,
}

impl ConversionResult {
    fn builder() -> ConversionResultBuilder {
        ConversionResultBuilder::default()
    }
}

// ------
// Driver
// ------

/// A driver for the conversion of one file.
#[derive(Clone, Builder)]
pub struct ConversionDriver<'a> {
    /// The control parameters for the conversion.
    parameters: &'a ConversionParams,

    /// The result of the conversion.
    #[builder(setter(skip), default = "None")]
    result: Option<ConversionResult>,
}

impl<'a> ConversionDriver<'a> {
    /// Returns a builder to construct a [`ConversionDriver`] structure.
    pub fn builder() -> ConversionDriverBuilder<'a> {
        ConversionDriverBuilder::default()
    }

    fn convert_basis_set(&self) -> Result<(ConvertedSet, Option<String>), anyhow::Error> {
        let params = self.parameters;
        let source_format = params.source_format.parse::<BasisFormat>()?;
        let target_format = params.target_format.parse::<BasisFormat>()?;

        let mut set = read_basis_set(&params.source, source_format, params.debug)?;
        if params.decontract {
            set = set.decontracted();
        }
        set.log_output_display();
        qbasis_output!("");

        let text = match params.target.as_ref() {
            Some(target) => {
                write_basis_set(target, &set, target_format)?;
                qbasis_output!("Basis set written to `{}`.", target.display());
                None
            }
            None => Some(set.encode_as(target_format)?),
        };
        Ok((ConvertedSet::Basis(set), text))
    }

    fn convert_ecp_set(&self) -> Result<(ConvertedSet, Option<String>), anyhow::Error> {
        let params = self.parameters;
        let source_format = params.source_format.parse::<EcpFormat>()?;
        let target_format = params.target_format.parse::<EcpFormat>()?;
        if params.decontract {
            qbasis_warn!("ECPs have no contractions. The decontraction request is ignored.");
        }

        let set = read_ecp_set(&params.source, source_format, params.debug)?;
        set.log_output_display();
        qbasis_output!("");

        let text = match params.target.as_ref() {
            Some(target) => {
                write_ecp_set(target, &set, target_format)?;
                qbasis_output!("ECP set written to `{}`.", target.display());
                None
            }
            None => Some(set.encode_as(target_format)?),
        };
        Ok((ConvertedSet::Ecp(set), text))
    }

    fn convert(&mut self) -> Result<(), anyhow::Error> {
        let params = self.parameters;
        match params.kind {
            ConversionKind::Basis => log_title("Basis-Set Conversion"),
            ConversionKind::Ecp => log_title("ECP Conversion"),
        }
        qbasis_output!("");
        params.log_output_display();

        if !params.source.is_file() {
            bail!("Source file `{}` does not exist.", params.source.display());
        }
        let (set, text) = match params.kind {
            ConversionKind::Basis => self.convert_basis_set()?,
            ConversionKind::Ecp => self.convert_ecp_set()?,
        };
        if let Some(text) = text.as_ref() {
            log_subtitle(&format!("Converted {} ({})", params.kind, params.target_format));
            qbasis_output!("");
            text.lines().for_each(|line| {
                qbasis_output!("{line}");
            });
            qbasis_output!("");
        }

        let result = ConversionResult::builder()
            .parameters(params.clone())
            .set(set)
            .text(text)
            .build()
            .map_err(|err| format_err!(err))?;
        self.result = Some(result);
        Ok(())
    }
}

impl<'a> QBasisDriver for ConversionDriver<'a> {
    type Params = ConversionParams;

    type Outcome = ConversionResult;

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.convert()
    }

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No conversion results found."))
    }
}
