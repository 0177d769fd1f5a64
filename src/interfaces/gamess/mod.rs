//! GAMESS basis sets and ECPs.
//!
//! Atom blocks are separated by blank lines. Each block starts with the atom name, followed by
//! shells whose rows carry a 1-based running index:
//!
//! ```text
//! C
//! S     2
//!   1         1.0000000   0.5000000
//!   2         2.0000000   0.5000000
//! ```
//!
//! ECP blocks start with an `ATOM-ECP GEN core_electrons shell_count` header (or
//! `ATOM-ECP NONE` when there is neither a core nor a channel), followed by
//! `N  -------  s-ul potential  ----------` channel headers and `exponent power coefficient`
//! rows. The header does not carry `l_max`, which is read back as the highest channel.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::angmom::AngularMomentum;
use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet, EcpTerm};
use crate::error::BasisError;
use crate::interfaces::{
    content_lines, encode_fixed_columns, parse_count, parse_float, report_failure, BasisCodec,
    EcpCodec,
};

#[cfg(test)]
#[path = "gamess_tests.rs"]
mod gamess_tests;

const FORMAT: &str = "gamess";

lazy_static! {
    static ref ECP_HEADER_RE: Regex =
        Regex::new(r"(?i)^(\S+)-ECP\s+(?:GEN\s+(\d+)\s+(\d+)|(NONE))$")
            .expect("Regex pattern invalid.");
    static ref ECP_CHANNEL_RE: Regex =
        Regex::new(r"(?i)^(\d+)\s+-+\s+([a-z])(?:-[a-z]+)?(?:\s+potential)?\s+-+$")
            .expect("Regex pattern invalid.");
}

/// Codec for the gamess format.
pub struct GamessCodec;

// ----------
// Basis sets
// ----------

impl BasisCodec for GamessCodec {
    fn encode_function(&self, function: &BasisFunction, _: &str) -> Result<String, BasisError> {
        Ok(encode_fixed_columns(function, true))
    }

    fn encode_atom_header(&self, basis: &Basis) -> Result<String, BasisError> {
        Ok(format!("{}\n", basis.atom()))
    }

    fn encode_set(&self, set: &BasisSet) -> Result<String, BasisError> {
        let mut out = String::new();
        for basis in set.iter() {
            out += &self.encode_basis(basis, true)?;
            out.push('\n');
        }
        Ok(out)
    }

    fn decode_set(&self, text: &str, debug: bool) -> Result<BasisSet, BasisError> {
        decode_basis_set(text).map_err(|err| report_failure(err, debug))
    }
}

/// Splits a file into the blocks found between blank lines. Comment-only lines do not end a
/// block.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = vec![vec![]];
    text.lines().for_each(|raw| {
        if raw.trim().is_empty() {
            if blocks.last().map(|block| !block.is_empty()).unwrap_or(false) {
                blocks.push(vec![]);
            }
        } else if let Some(block) = blocks.last_mut() {
            block.extend(content_lines(raw));
        }
    });
    blocks.retain(|block| !block.is_empty());
    blocks
}

fn decode_basis_set(text: &str) -> Result<BasisSet, BasisError> {
    split_blocks(text)
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            decode_atom_block(&block).map_err(|err| err.located(FORMAT, i, &block.join("\n")))
        })
        .collect()
}

/// Decodes the lines of one atom block, starting with the atom name.
fn decode_atom_block(lines: &[&str]) -> Result<Basis, BasisError> {
    let (header, shells) = lines
        .split_first()
        .ok_or_else(|| BasisError::parse(FORMAT, "empty atom block"))?;
    let atom = header
        .split_whitespace()
        .next()
        .ok_or_else(|| BasisError::parse(FORMAT, "missing atom name"))?;

    let mut functions = vec![];
    let mut rows = shells.iter();
    while let Some(shell_header) = rows.next() {
        let (tag, n) = match shell_header.split_whitespace().collect_vec().as_slice() {
            [tag, n] => (tag.parse::<AngularMomentum>()?, parse_count::<usize>(FORMAT, n)?),
            _ => {
                return Err(BasisError::parse(
                    FORMAT,
                    format!("expected a shell header `TAG N`, found `{shell_header}`"),
                ))
            }
        };
        let ncols = tag.n_coefficient_columns();
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
            // The leading running index is skipped.
            let values = row
                .split_whitespace()
                .skip(1)
                .map(|token| parse_float(FORMAT, token))
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() != ncols + 1 {
                return Err(BasisError::parse(
                    FORMAT,
                    format!(
                        "expected an index and {} values per row of a {tag} shell, found `{row}`",
                        ncols + 1
                    ),
                ));
            }
            exponents.push(values[0]);
            coefficients
                .iter_mut()
                .zip(values[1..].iter())
                .for_each(|(col, c)| col.push(*c));
        }
        functions.push(BasisFunction::from_parts(tag, exponents, coefficients)?);
    }
    Ok(Basis::new(atom, functions))
}

// ----
// ECPs
// ----

impl EcpCodec for GamessCodec {
    fn encode_ecp_function(&self, function: &EcpFunction, _: u32) -> Result<String, BasisError> {
        let mut out = format!(
            "{}   -------  {}-ul potential  ----------\n",
            function.len(),
            function.shell()
        );
        function.terms().iter().for_each(|term| {
            out += &format!(
                "{:>17.8}{:>3}{:>19.8}\n",
                term.exponent, term.power, term.coefficient
            );
        });
        Ok(out)
    }

    fn encode_ecp(&self, ecp: &Ecp) -> Result<String, BasisError> {
        if ecp.is_empty() && ecp.core_electrons() == 0 {
            return Ok(format!("{}-ECP NONE\n", ecp.atom()));
        }
        let mut out = format!(
            "{}-ECP GEN {:>6} {:>5}\n",
            ecp.atom(),
            ecp.core_electrons(),
            ecp.len()
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
            .concat())
    }

    fn decode_ecp_set(&self, text: &str, debug: bool) -> Result<EcpSet, BasisError> {
        decode_ecp_set(text).map_err(|err| report_failure(err, debug))
    }
}

fn decode_ecp_set(text: &str) -> Result<EcpSet, BasisError> {
    let lines = content_lines(text).collect_vec();
    let starts = lines
        .iter()
        .positions(|line| ECP_HEADER_RE.is_match(line))
        .collect_vec();
    if let Some(first) = lines.first() {
        if starts.first() != Some(&0) {
            return Err(BasisError::parse(
                FORMAT,
                format!("expected an ECP header `ATOM-ECP GEN core n`, found `{first}`"),
            )
            .located(FORMAT, 0, &lines.iter().join("\n")));
        }
    }
    let ends = starts
        .iter()
        .skip(1)
        .copied()
        .chain(std::iter::once(lines.len()));
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

/// Decodes the lines of one ECP block, starting with its header.
fn decode_ecp_block(lines: &[&str]) -> Result<Ecp, BasisError> {
    let caps = ECP_HEADER_RE
        .captures(lines[0])
        .ok_or_else(|| BasisError::parse(FORMAT, "missing ECP header"))?;
    let atom = &caps[1];
    if caps.get(4).is_some() {
        if lines.len() > 1 {
            return Err(BasisError::parse(
                FORMAT,
                format!("{atom}-ECP NONE cannot be followed by channels"),
            ));
        }
        return Ecp::new(atom, 0, 0, vec![]);
    }
    let core_electrons = parse_count::<u32>(FORMAT, &caps[2])?;
    let n_channels = parse_count::<usize>(FORMAT, &caps[3])?;

    let mut functions = Vec::new();
    let mut rows = lines[1..].iter();
    while let Some(channel) = rows.next() {
        let channel_caps = ECP_CHANNEL_RE.captures(channel).ok_or_else(|| {
            BasisError::parse(
                FORMAT,
                format!("expected a channel header such as `2 --- s-ul potential ---`, found `{channel}`"),
            )
        })?;
        let n = parse_count::<usize>(FORMAT, &channel_caps[1])?;
        let shell = &channel_caps[2];
        let terms = (0..n)
            .map(|_| -> Result<EcpTerm, BasisError> {
                let row = rows.next().ok_or_else(|| {
                    BasisError::parse(
                        FORMAT,
                        format!("{shell} channel declares {n} terms but the block ends early"),
                    )
                })?;
                match row.split_whitespace().collect_vec().as_slice() {
                    [exponent, power, coefficient] => Ok(EcpTerm::new(
                        parse_count(FORMAT, power)?,
                        parse_float(FORMAT, exponent)?,
                        parse_float(FORMAT, coefficient)?,
                    )),
                    _ => Err(BasisError::parse(
                        FORMAT,
                        format!("expected `exponent power coefficient`, found `{row}`"),
                    )),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        functions.push(EcpFunction::new(shell, terms)?);
    }
    // Files written here count the channels; GAMESS itself writes l_max, one fewer.
    if functions.len() != n_channels && n_channels.checked_add(1) != Some(functions.len()) {
        return Err(BasisError::parse(
            FORMAT,
            format!(
                "header of {atom} declares {n_channels} channels, found {}",
                functions.len()
            ),
        ));
    }

    let l_max = functions.iter().map(EcpFunction::l).max().unwrap_or(0);
    Ecp::new(atom, l_max, core_electrons, functions)
}
