//! Gaussian94 (`.gbs`) basis sets and ECPs.
//!
//! Basis sets consist of an optional angular-convention preamble followed by atom blocks
//! separated by `****` lines:
//!
//! ```text
//! spherical
//! ****
//! C    0
//! S     2
//!         1.0000000   0.5000000
//!         2.0000000   0.5000000
//! ****
//! ```
//!
//! Shell headers may carry a scale factor (`S 3 1.00`), which multiplies every exponent of the
//! shell by its square. ECP blocks start with an `ATOM 0` line followed by an
//! `ATOM-ECP GEN core_electrons l_max` header, and then list their channels.

use std::iter;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::angmom::AngularMomentum;
use crate::basis::{AngularConvention, Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet, EcpTerm};
use crate::error::BasisError;
use crate::interfaces::{
    content_lines, encode_fixed_columns, parse_count, parse_float, report_failure, BasisCodec,
    EcpCodec,
};

#[cfg(test)]
#[path = "gaussian94_tests.rs"]
mod gaussian94_tests;

const FORMAT: &str = "gaussian94";

/// The line separating atom blocks.
const SEPARATOR: &str = "****";

lazy_static! {
    static ref ATOM_LINE_RE: Regex =
        Regex::new(r"^-?([A-Za-z][A-Za-z0-9]*)\s+0$").expect("Regex pattern invalid.");
    static ref ECP_HEADER_RE: Regex =
        Regex::new(r"(?i)^(\S+)-ECP\s+(GEN\s+)?(\d+)\s+(\d+)$").expect("Regex pattern invalid.");
    static ref ECP_CHANNEL_RE: Regex =
        Regex::new(r"(?i)^([a-z])(-[a-z]+)?(\s+potential)?$").expect("Regex pattern invalid.");
}

/// Codec for the gaussian94 format.
pub struct Gaussian94Codec;

// -----------
// Basis sets
// -----------

impl BasisCodec for Gaussian94Codec {
    fn encode_function(&self, function: &BasisFunction, _: &str) -> Result<String, BasisError> {
        Ok(encode_fixed_columns(function, false))
    }

    fn encode_atom_header(&self, basis: &Basis) -> Result<String, BasisError> {
        Ok(format!("{}    0\n", basis.atom()))
    }

    fn encode_set(&self, set: &BasisSet) -> Result<String, BasisError> {
        let mut out = format!("{}\n{SEPARATOR}\n", set.angular_convention);
        for basis in set.iter() {
            out += &self.encode_basis(basis, true)?;
            out += SEPARATOR;
            out.push('\n');
        }
        Ok(out)
    }

    fn decode_set(&self, text: &str, debug: bool) -> Result<BasisSet, BasisError> {
        decode_basis_set(text).map_err(|err| report_failure(err, debug))
    }
}

/// Splits the content lines of a file into the chunks found between separator lines.
fn split_chunks(text: &str) -> Vec<Vec<&str>> {
    let mut chunks = vec![vec![]];
    content_lines(text).for_each(|line| {
        if line == SEPARATOR {
            chunks.push(vec![]);
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push(line);
        }
    });
    chunks
}

fn decode_basis_set(text: &str) -> Result<BasisSet, BasisError> {
    let mut set = BasisSet::new();
    let mut convention = None;
    for (i, chunk) in split_chunks(text).into_iter().enumerate() {
        // Convention keywords may only precede the atom header.
        let n_keywords = chunk
            .iter()
            .take_while(|line| line.parse::<AngularConvention>().is_ok())
            .count();
        if let Some(keyword) = chunk[..n_keywords].last() {
            convention = keyword.parse::<AngularConvention>().ok();
        }
        let block = &chunk[n_keywords..];
        if block.is_empty() {
            continue;
        }
        let basis =
            decode_atom_block(block).map_err(|err| err.located(FORMAT, i, &chunk.join("\n")))?;
        set.insert(basis);
    }
    set.angular_convention = convention.unwrap_or_default();
    Ok(set)
}

/// Decodes the lines of one atom block, starting with its `SYMBOL 0` header.
fn decode_atom_block(lines: &[&str]) -> Result<Basis, BasisError> {
    let (header, shells) = lines
        .split_first()
        .ok_or_else(|| BasisError::parse(FORMAT, "empty atom block"))?;
    let atom = ATOM_LINE_RE
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|atom| atom.as_str())
        .ok_or_else(|| {
            BasisError::parse(
                FORMAT,
                format!("expected an atom header `SYMBOL 0`, found `{header}`"),
            )
        })?;

    let mut functions = vec![];
    let mut rows = shells.iter();
    while let Some(shell_header) = rows.next() {
        let tokens = shell_header.split_whitespace().collect_vec();
        let (tag, n, scale) = match tokens.as_slice() {
            [tag, n] => (*tag, parse_count::<usize>(FORMAT, n)?, 1.0),
            [tag, n, scale] => (
                *tag,
                parse_count::<usize>(FORMAT, n)?,
                parse_float(FORMAT, scale)?,
            ),
            _ => {
                return Err(BasisError::parse(
                    FORMAT,
                    format!("expected a shell header `TAG N [scale]`, found `{shell_header}`"),
                ))
            }
        };
        let angmom = tag.parse::<AngularMomentum>()?;
        let ncols = angmom.n_coefficient_columns();
        let capacity = n.min(rows.len());
        let mut exponents = Vec::with_capacity(capacity);
        let mut coefficients = vec![Vec::with_capacity(capacity); ncols];
        for _ in 0..n {
            let row = rows.next().ok_or_else(|| {
                BasisError::parse(
                    FORMAT,
                    format!("{tag} shell declares {n} primitives but the block ends early"),
                )
            })?;
            let values = row
                .split_whitespace()
                .map(|token| parse_float(FORMAT, token))
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() != ncols + 1 {
                return Err(BasisError::parse(
                    FORMAT,
                    format!(
                        "expected {} values per row of a {tag} shell, found {} in `{row}`",
                        ncols + 1,
                        values.len()
                    ),
                ));
            }
            exponents.push(values[0] * scale * scale);
            coefficients
                .iter_mut()
                .zip(values[1..].iter())
                .for_each(|(col, c)| col.push(*c));
        }
        functions.push(BasisFunction::from_parts(angmom, exponents, coefficients)?);
    }
    Ok(Basis::new(atom, functions))
}

// ----
// ECPs
// ----

impl EcpCodec for Gaussian94Codec {
    fn encode_ecp_function(&self, function: &EcpFunction, _: u32) -> Result<String, BasisError> {
        let mut out = format!("{}-ul potential\n{:>4}\n", function.shell(), function.len());
        function.terms().iter().for_each(|term| {
            out += &format!(
                "{}{:>16.8}{:>21.8}\n",
                term.power, term.exponent, term.coefficient
            );
        });
        Ok(out)
    }

    fn encode_ecp(&self, ecp: &Ecp) -> Result<String, BasisError> {
        let mut out = format!(
            "{}      0\n{}-ECP GEN {:>6} {:>5}\n",
            ecp.atom(),
            ecp.atom(),
            ecp.core_electrons(),
            ecp.l_max()
        );
        for function in ecp.iter() {
            out += &self.encode_ecp_function(function, ecp.l_max())?;
        }
        Ok(out)
    }

    fn encode_ecp_set(&self, set: &EcpSet) -> Result<String, BasisError> {
        Ok(set
            .iter()
            .map(|ecp| self.encode_ecp(ecp))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"))
    }

    fn decode_ecp_set(&self, text: &str, debug: bool) -> Result<EcpSet, BasisError> {
        decode_ecp_set(text).map_err(|err| report_failure(err, debug))
    }
}

fn decode_ecp_set(text: &str) -> Result<EcpSet, BasisError> {
    let lines = content_lines(text).collect_vec();
    let starts = lines
        .iter()
        .positions(|line| ATOM_LINE_RE.is_match(line))
        .collect_vec();
    if let Some(first) = lines.first() {
        if starts.first() != Some(&0) {
            return Err(BasisError::parse(
                FORMAT,
                format!("expected an atom header `SYMBOL 0`, found `{first}`"),
            )
            .located(FORMAT, 0, &lines.iter().join("\n")));
        }
    }
    let ends = starts.iter().skip(1).copied().chain(iter::once(lines.len()));
    starts
        .iter()
        .zip(ends)
        .enumerate()
        .map(|(i, (start, end))| {
            let block = &lines[*start..end];
            decode_ecp_block(block).map_err(|err| err.located(FORMAT, i, &block.join("\n")))
        })
        .collect()
}

/// Decodes the lines of one ECP block, starting with its `SYMBOL 0` line.
fn decode_ecp_block(lines: &[&str]) -> Result<Ecp, BasisError> {
    let atom = ATOM_LINE_RE
        .captures(lines[0])
        .and_then(|caps| caps.get(1))
        .map(|atom| atom.as_str())
        .ok_or_else(|| BasisError::parse(FORMAT, "missing atom header"))?;
    let header = lines
        .get(1)
        .ok_or_else(|| BasisError::parse(FORMAT, format!("missing ECP header for {atom}")))?;
    let caps = ECP_HEADER_RE.captures(header).ok_or_else(|| {
        BasisError::parse(
            FORMAT,
            format!("expected an ECP header `{atom}-ECP GEN core l_max`, found `{header}`"),
        )
    })?;
    let first = parse_count::<u32>(FORMAT, &caps[3])?;
    let second = parse_count::<u32>(FORMAT, &caps[4])?;

    // With `GEN`, the core-electron count comes first. Gaussian's own layout lists `l_max` first.
    let (core_electrons, l_max) = if caps.get(2).is_some() {
        (first, second)
    } else {
        (second, first)
    };

    let mut functions = vec![];
    let mut rows = lines[2..].iter();
    while let Some(channel) = rows.next() {
        let shell = ECP_CHANNEL_RE
            .captures(channel)
            .and_then(|caps| caps.get(1))
            .map(|shell| shell.as_str())
            .ok_or_else(|| {
                BasisError::parse(
                    FORMAT,
                    format!("expected a channel header such as `s-ul potential`, found `{channel}`"),
                )
            })?;
        let n = rows
            .next()
            .ok_or_else(|| BasisError::parse(FORMAT, format!("missing term count for {shell}")))
            .and_then(|count| parse_count::<usize>(FORMAT, count))?;
        let terms = (0..n)
            .map(|_| -> Result<EcpTerm, BasisError> {
                let row = rows.next().ok_or_else(|| {
                    BasisError::parse(
                        FORMAT,
                        format!("{shell} channel declares {n} terms but the block ends early"),
                    )
                })?;
                match row.split_whitespace().collect_vec().as_slice() {
                    [power, exponent, coefficient] => Ok(EcpTerm::new(
                        parse_count(FORMAT, power)?,
                        parse_float(FORMAT, exponent)?,
                        parse_float(FORMAT, coefficient)?,
                    )),
                    _ => Err(BasisError::parse(
                        FORMAT,
                        format!("expected `power exponent coefficient`, found `{row}`"),
                    )),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        functions.push(EcpFunction::new(shell, terms)?);
    }
    Ecp::new(atom, l_max, core_electrons, functions)
}
