//! BAGEL JSON basis sets.
//!
//! A basis set is a JSON object mapping each atom symbol to an array of shells:
//!
//! ```json
//! {
//!   "H": [
//!     { "angular": "s", "prim": [1.0, 2.0], "cont": [[0.5, 0.5]] }
//!   ]
//! }
//! ```
//!
//! A shell whose `cont` holds several columns is a general contraction, and is decoded into one
//! function per column sharing the same exponents. `sp` shells hold exactly two columns.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::angmom::AngularMomentum;
use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::error::BasisError;
use crate::interfaces::{report_failure, BasisCodec};


const FORMAT: &str = "bagel";

/// Structure for one shell of a BAGEL basis set.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BagelShell {
    /// The lower-case angular-momentum label.
    angular: String,

    /// The exponents of the primitives.
    prim: Vec<f64>,

    /// The contraction columns.
    cont: Vec<Vec<f64>>,
}

impl From<&BasisFunction> for BagelShell {
    fn from(function: &BasisFunction) -> Self {
        Self {
            angular: function.angmom().label().to_lowercase(),
            prim: function.exponents().to_vec(),
            cont: function.coefficients().to_vec(),
        }
    }
}

impl BagelShell {
    /// Turns the shell into basis functions, splitting general contractions.
    fn into_functions(self) -> Result<Vec<BasisFunction>, BasisError> {
        let angmom = self.angular.parse::<AngularMomentum>()?;
        match angmom {
            AngularMomentum::SP => Ok(vec![BasisFunction::from_parts(
                angmom, self.prim, self.cont,
            )?]),
            AngularMomentum::Single(_) => {
                if self.cont.is_empty() {
                    return Err(BasisError::WrongCoefficientArity {
                        angmom: angmom.to_string(),
                        expected: 1,
                        found: 0,
                    });
                }
                self.cont
                    .into_iter()
                    .map(|col| BasisFunction::from_parts(angmom, self.prim.clone(), vec![col]))
                    .collect()
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, BasisError> {
    serde_json::to_string_pretty(value).map_err(|err| BasisError::Serialisation(err.to_string()))
}

/// Codec for the bagel format.
pub struct BagelCodec;

impl BasisCodec for BagelCodec {
    fn encode_function(&self, function: &BasisFunction, _: &str) -> Result<String, BasisError> {
        to_json(&BagelShell::from(function))
    }

    fn encode_atom_header(&self, basis: &Basis) -> Result<String, BasisError> {
        Ok(format!("{} : ", to_json(&basis.atom())?))
    }

    /// Encodes the shells of one atom as a JSON array, preceded by the quoted atom symbol if
    /// `include_header` is set.
    fn encode_basis(&self, basis: &Basis, include_header: bool) -> Result<String, BasisError> {
        let header = if include_header {
            self.encode_atom_header(basis)?
        } else {
            String::new()
        };
        let shells = basis.iter().map(BagelShell::from).collect_vec();
        Ok(header + &to_json(&shells)?)
    }

    fn encode_set(&self, set: &BasisSet) -> Result<String, BasisError> {
        let atoms = set
            .iter()
            .map(|basis| {
                (
                    basis.atom().to_string(),
                    basis.iter().map(BagelShell::from).collect_vec(),
                )
            })
            .collect::<IndexMap<_, _>>();
        Ok(to_json(&atoms)? + "\n")
    }

    fn decode_set(&self, text: &str, debug: bool) -> Result<BasisSet, BasisError> {
        decode_basis_set(text).map_err(|err| report_failure(err, debug))
    }
}

fn decode_basis_set(text: &str) -> Result<BasisSet, BasisError> {
    let atoms: IndexMap<String, Vec<BagelShell>> = serde_json::from_str(text).map_err(|err| {
        BasisError::parse(FORMAT, err.to_string()).located(
            FORMAT,
            0,
            text.lines()
                .skip(err.line().saturating_sub(1))
                .join("\n")
                .as_str(),
        )
    })?;
    atoms
        .into_iter()
        .enumerate()
        .map(|(i, (atom, shells))| {
            let context = format!("\"{atom}\": {} shell(s)", shells.len());
            shells
                .into_iter()
                .map(BagelShell::into_functions)
                .flatten_ok()
                .collect::<Result<Vec<_>, _>>()
                .map(|functions| Basis::new(&atom, functions))
                .map_err(|err| err.located(FORMAT, i, &context))
        })
        .collect()
}
