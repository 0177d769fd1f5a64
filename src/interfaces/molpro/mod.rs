//! Molpro basis sets.
//!
//! Each shell is declared by a `tag, atom, exp1, exp2, ...` line and contracted by the
//! `c, start.end, coeff1, coeff2, ...` lines following it, where `start.end` is a 1-based
//! inclusive range into the exponents of the shell:
//!
//! ```text
//! basis={
//! ! C
//! s, C, 0.1, 0.4
//! c, 1.2, 0.6, 0.4
//! }
//! ```
//!
//! Statements may also be separated by `;`. A shell without `c` lines stands for its uncontracted
//! primitives.

use indexmap::IndexMap;
use itertools::Itertools;

use crate::angmom::AngularMomentum;
use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::error::BasisError;
use crate::interfaces::{parse_count, parse_float, report_failure, BasisCodec};


const FORMAT: &str = "molpro";

/// Codec for the molpro format.
pub struct MolproCodec;

impl BasisCodec for MolproCodec {
    fn encode_function(&self, function: &BasisFunction, atom: &str) -> Result<String, BasisError> {
        let exponents = function.exponents().iter().map(|exp| exp.to_string()).join(", ");
        let mut out = if atom.is_empty() {
            format!("{}, {exponents}\n", function.angmom().label().to_lowercase())
        } else {
            format!(
                "{}, {atom}, {exponents}\n",
                function.angmom().label().to_lowercase()
            )
        };
        function.coefficients().iter().for_each(|col| {
            out += &format!(
                "c, 1.{}, {}\n",
                function.len(),
                col.iter().map(|c| c.to_string()).join(", ")
            );
        });
        Ok(out)
    }

    fn encode_atom_header(&self, basis: &Basis) -> Result<String, BasisError> {
        Ok(format!("! {}\n", basis.atom()))
    }

    fn encode_set(&self, set: &BasisSet) -> Result<String, BasisError> {
        let mut out = "basis={\n".to_string();
        for basis in set.iter() {
            out += &self.encode_basis(basis, true)?;
        }
        out += "}\n";
        Ok(out)
    }

    fn decode_set(&self, text: &str, debug: bool) -> Result<BasisSet, BasisError> {
        decode_basis_set(text).map_err(|err| report_failure(err, debug))
    }
}

// --------
// Decoding
// --------

/// A contraction line: the 1-based inclusive exponent range and its coefficients.
#[derive(Clone, Debug)]
struct Contraction {
    start: usize,
    end: usize,
    coefficients: Vec<f64>,
}

/// A shell line together with the contraction lines following it.
#[derive(Clone, Debug)]
struct PendingShell {
    atom: String,
    angmom: AngularMomentum,
    exponents: Vec<f64>,
    contractions: Vec<Contraction>,
    statements: Vec<String>,
}

impl PendingShell {
    fn parse(fields: &[&str]) -> Result<Self, BasisError> {
        let (tag, atom, exponents) = match fields {
            [tag, atom, exponents @ ..] if parse_float(FORMAT, atom).is_err() => {
                (tag, atom, exponents)
            }
            _ => {
                return Err(BasisError::parse(
                    FORMAT,
                    format!(
                        "expected a shell line `tag, atom, exp...`, found `{}`",
                        fields.join(", ")
                    ),
                ))
            }
        };
        let angmom = tag.parse::<AngularMomentum>()?;
        let exponents = exponents
            .iter()
            .map(|exp| parse_float(FORMAT, exp))
            .collect::<Result<Vec<_>, _>>()?;
        if exponents.is_empty() {
            return Err(BasisError::parse(
                FORMAT,
                format!("{angmom} shell of {atom} has no exponents"),
            ));
        }
        Ok(Self {
            atom: atom.to_string(),
            angmom,
            exponents,
            contractions: vec![],
            statements: vec![fields.join(", ")],
        })
    }

    /// Parses a `c, start.end, coeff...` line against the exponents of this shell.
    fn add_contraction(&mut self, fields: &[&str]) -> Result<(), BasisError> {
        self.statements.push(fields.join(", "));
        let (range, coefficients) = match fields {
            [_, range, coefficients @ ..] => (range, coefficients),
            _ => {
                return Err(BasisError::parse(
                    FORMAT,
                    "expected a contraction line `c, start.end, coeff...`",
                ))
            }
        };
        let (start, end) = range
            .split_once('.')
            .ok_or_else(|| {
                BasisError::parse(FORMAT, format!("expected a range `start.end`, found `{range}`"))
            })
            .and_then(|(start, end)| {
                Ok((
                    parse_count::<usize>(FORMAT, start)?,
                    parse_count::<usize>(FORMAT, end)?,
                ))
            })?;
        if start == 0 || start > end || end > self.exponents.len() {
            return Err(BasisError::parse(
                FORMAT,
                format!(
                    "range {start}.{end} does not address the {} exponents of the shell",
                    self.exponents.len()
                ),
            ));
        }
        let coefficients = coefficients
            .iter()
            .map(|c| parse_float(FORMAT, c))
            .collect::<Result<Vec<_>, _>>()?;
        if coefficients.len() != end - start + 1 {
            return Err(BasisError::LengthMismatch {
                expected: end - start + 1,
                found: coefficients.len(),
            });
        }
        self.contractions.push(Contraction {
            start,
            end,
            coefficients,
        });
        Ok(())
    }

    fn into_functions(self) -> Result<Vec<BasisFunction>, BasisError> {
        let ncols = self.angmom.n_coefficient_columns();
        if self.contractions.is_empty() {
            return self
                .exponents
                .iter()
                .map(|exp| BasisFunction::from_parts(self.angmom, vec![*exp], vec![vec![1.0]; ncols]))
                .collect();
        }
        match self.angmom {
            AngularMomentum::SP => match self.contractions.as_slice() {
                [s, p] if s.start == p.start && s.end == p.end => {
                    Ok(vec![BasisFunction::from_parts(
                        self.angmom,
                        self.exponents[s.start - 1..s.end].to_vec(),
                        vec![s.coefficients.clone(), p.coefficients.clone()],
                    )?])
                }
                [_, _] => Err(BasisError::parse(
                    FORMAT,
                    "the two contraction lines of an sp shell must share one range",
                )),
                contractions => Err(BasisError::WrongCoefficientArity {
                    angmom: self.angmom.to_string(),
                    expected: 2,
                    found: contractions.len(),
                }),
            },
            AngularMomentum::Single(_) => self
                .contractions
                .iter()
                .map(|contraction| {
                    BasisFunction::from_parts(
                        self.angmom,
                        self.exponents[contraction.start - 1..contraction.end].to_vec(),
                        vec![contraction.coefficients.clone()],
                    )
                })
                .collect(),
        }
    }
}

/// Splits the text into statements, dropping comments, blank statements and the `basis={ ... }`
/// wrapper.
fn statements(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('!').next().unwrap_or_default())
        .flat_map(|line| line.split(';'))
        .map(|statement| {
            let mut statement = statement.trim();
            if statement.to_lowercase().starts_with("basis") {
                if let Some(pos) = statement.find('{') {
                    statement = statement[pos + 1..].trim();
                }
            }
            statement.trim_end_matches('}').trim().to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

fn decode_basis_set(text: &str) -> Result<BasisSet, BasisError> {
    let mut shells: Vec<PendingShell> = vec![];
    for statement in statements(text) {
        let fields = statement.split(',').map(str::trim).collect_vec();
        let chunk = shells.len();
        if fields[0].eq_ignore_ascii_case("c") {
            let shell = shells.last_mut().ok_or_else(|| {
                BasisError::parse(
                    FORMAT,
                    format!("contraction line `{statement}` precedes any shell line"),
                )
                .located(FORMAT, 0, &statement)
            })?;
            shell
                .add_contraction(&fields)
                .map_err(|err| err.located(FORMAT, chunk - 1, &shell.statements.join("\n")))?;
        } else {
            shells.push(
                PendingShell::parse(&fields).map_err(|err| err.located(FORMAT, chunk, &statement))?,
            );
        }
    }

    let mut atoms: IndexMap<String, Vec<BasisFunction>> = IndexMap::new();
    for (i, shell) in shells.into_iter().enumerate() {
        let context = shell.statements.join("\n");
        let atom = shell.atom.clone();
        let functions = shell
            .into_functions()
            .map_err(|err| err.located(FORMAT, i, &context))?;
        atoms.entry(atom).or_default().extend(functions);
    }
    Ok(atoms
        .into_iter()
        .map(|(atom, functions)| Basis::new(&atom, functions))
        .collect())
}
