//! YAML configuration of the `qbasis` binary.

use std::path::PathBuf;

use anyhow::{self, bail};
use serde::{Deserialize, Serialize};

use crate::drivers::conversion::{ConversionDriver, ConversionKind, ConversionParams};
use crate::drivers::QBasisDriver;
use crate::interfaces::InputHandle;
use crate::io::format::{qbasis_error, qbasis_output};


/// A structure containing `qbasis` input parameters which can be serialised into and deserialised
/// from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// The conversions to be run, in order.
    #[serde(default)]
    pub conversions: Vec<ConversionParams>,

    /// Boolean indicating if the remaining conversions are to be attempted after one fails.
    ///
    /// If not specified, this will be taken to be `false`.
    #[serde(default)]
    pub keep_going: bool,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            conversions: vec![
                ConversionParams {
                    kind: ConversionKind::Basis,
                    source: PathBuf::from("basis.gbs"),
                    source_format: "gaussian94".to_string(),
                    target: Some(PathBuf::from("GENBAS")),
                    target_format: "cfour".to_string(),
                    decontract: false,
                    debug: false,
                },
                ConversionParams {
                    kind: ConversionKind::Ecp,
                    source: PathBuf::from("ecp.gbs"),
                    source_format: "gaussian94".to_string(),
                    target: None,
                    target_format: "gamess".to_string(),
                    decontract: false,
                    debug: false,
                },
            ],
            keep_going: false,
        }
    }
}

impl InputHandle for Input {
    fn handle(&self) -> Result<(), anyhow::Error> {
        let mut n_failed = 0;
        for params in self.conversions.iter() {
            let mut driver = ConversionDriver::builder().parameters(params).build()?;
            if let Err(err) = driver.run() {
                qbasis_error!("Conversion of `{}` failed: {err}", params.source.display());
                if !self.keep_going {
                    return Err(err);
                }
                n_failed += 1;
            }
            qbasis_output!("");
        }
        if n_failed > 0 {
            bail!(
                "{n_failed} of {} conversion(s) failed.",
                self.conversions.len()
            );
        }
        Ok(())
    }
}
