//! CFOUR `GENBAS` basis sets and `ECPDATA` ECPs.
//!
//! A `GENBAS` entry reads
//!
//! ```text
//! C:QBASIS
//! qbasis
//!
//!   2
//!     0    1
//!     1    1
//!     2    3
//!
//!  exponents of shell 1 (5 per line)
//!
//!  coefficients of shell 1 (one row per exponent, 6 per line)
//!
//!  ...
//! ```
//!
//! where the three lines after the shell count give, per shell, the angular momentum, the number
//! of contracted functions and the number of exponents. Everything after the comment line is
//! read as a stream of numbers whose length must agree with the declared counts.
//!
//! `SP` functions are written as an S shell followed by a P shell on the same exponents, and such
//! a pair is read back as one `SP` function.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::angmom::{AngularMomentum, ANGMOM_LABELS};
use crate::basis::{Basis, BasisFunction, BasisSet};
use crate::ecp::{Ecp, EcpFunction, EcpSet, EcpTerm};
use crate::error::BasisError;
use crate::interfaces::{
    content_lines, parse_count, parse_float, report_failure, BasisCodec, EcpCodec,
};

#[cfg(test)]
#[path = "cfour_tests.rs"]
mod cfour_tests;

const FORMAT: &str = "cfour";

/// The basis name written when neither the basis nor the set is named.
const DEFAULT_NAME: &str = "QBASIS";

const EXPONENTS_PER_LINE: usize = 5;
const COEFFICIENTS_PER_LINE: usize = 6;

lazy_static! {
    static ref HEADER_RE: Regex =
        Regex::new(r"^([A-Za-z][A-Za-z0-9]*):(\S*)").expect("Regex pattern invalid.");
    static ref NCORE_RE: Regex = Regex::new(r"(?i)^NCORE\s*=\s*(\d+)\s+LMAX\s*=\s*(\d+)$")
        .expect("Regex pattern invalid.");
    static ref ECP_CHANNEL_RE: Regex =
        Regex::new(r"(?i)^([a-z])(-[a-z]+)?$").expect("Regex pattern invalid.");
}

/// Codec for the cfour format.
pub struct CfourCodec;

// ----------
// Basis sets
// ----------

/// A shell as laid out in a `GENBAS` entry: one angular momentum, shared exponents, and any
/// number of contraction columns.
#[derive(Clone, Debug)]
struct GenbasShell {
    l: u32,
    exponents: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl GenbasShell {
    /// The shells a function is written as. `SP` becomes an S shell and a P shell.
    fn from_function(function: &BasisFunction) -> Vec<GenbasShell> {
        function
            .angmom()
            .components()
            .into_iter()
            .zip(function.coefficients())
            .map(|(angmom, col)| GenbasShell {
                l: angmom.index().unwrap_or_default(),
                exponents: function.exponents().to_vec(),
                columns: vec![col.clone()],
            })
            .collect()
    }

    /// The numbers of this shell: exponents, then one coefficient row per exponent.
    fn write_numbers(&self, out: &mut String) {
        self.exponents
            .chunks(EXPONENTS_PER_LINE)
            .for_each(|chunk| *out += &format!("{}\n", chunk.iter().map(|x| write_number(*x)).join("")));
        out.push('\n');
        (0..self.exponents.len()).for_each(|i| {
            let row = self.columns.iter().map(|col| col[i]).collect_vec();
            row.chunks(COEFFICIENTS_PER_LINE).for_each(|chunk| {
                *out += &format!("{}\n", chunk.iter().map(|x| write_number(*x)).join(""));
            });
        });
        out.push('\n');
    }
}

fn write_number(x: f64) -> String {
    format!(" {x:>17.10}")
}

/// The name written in the header of an atom entry: upper case, without whitespace.
fn entry_name(basis: &Basis, set_name: Option<&str>) -> String {
    basis
        .name()
        .or(set_name)
        .unwrap_or(DEFAULT_NAME)
        .split_whitespace()
        .join("_")
        .to_uppercase()
}

/// Writes the counts and numbers of the shells of one entry.
fn write_shells(shells: &[GenbasShell]) -> String {
    let mut out = format!("{:>3}\n", shells.len());
    out += &format!("{}\n", shells.iter().map(|s| format!("{:>5}", s.l)).join(""));
    out += &format!(
        "{}\n",
        shells.iter().map(|s| format!("{:>5}", s.columns.len())).join("")
    );
    out += &format!(
        "{}\n",
        shells.iter().map(|s| format!("{:>5}", s.exponents.len())).join("")
    );
    out.push('\n');
    shells.iter().for_each(|shell| shell.write_numbers(&mut out));
    out
}

/// Writes a whole entry, header included.
fn write_entry(basis: &Basis, set_name: Option<&str>) -> String {
    let shells = basis
        .iter()
        .flat_map(GenbasShell::from_function)
        .collect_vec();
    let name = entry_name(basis, set_name);
    format!("{}:{name}\n{name}\n\n", basis.atom()) + &write_shells(&shells)
}

impl BasisCodec for CfourCodec {
    /// Writes the counts and numbers of the shells of a single function, without an entry
    /// header.
    fn encode_function(&self, function: &BasisFunction, _: &str) -> Result<String, BasisError> {
        Ok(write_shells(&GenbasShell::from_function(function)))
    }

    fn encode_atom_header(&self, basis: &Basis) -> Result<String, BasisError> {
        let name = entry_name(basis, None);
        Ok(format!("{}:{name}\n{name}\n\n", basis.atom()))
    }

    fn encode_basis(&self, basis: &Basis, include_header: bool) -> Result<String, BasisError> {
        if include_header {
            Ok(write_entry(basis, None))
        } else {
            let shells = basis
                .iter()
                .flat_map(GenbasShell::from_function)
                .collect_vec();
            Ok(write_shells(&shells))
        }
    }

    fn encode_set(&self, set: &BasisSet) -> Result<String, BasisError> {
        Ok(set
            .iter()
            .map(|basis| write_entry(basis, set.name.as_deref()))
            .join(""))
    }

    fn decode_set(&self, text: &str, debug: bool) -> Result<BasisSet, BasisError> {
        decode_basis_set(text).map_err(|err| report_failure(err, debug))
    }
}

/// Splits a file into entries, each starting at an `ATOM:NAME` header line.
fn split_entries(text: &str) -> Result<Vec<Vec<&str>>, BasisError> {
    let mut entries: Vec<Vec<&str>> = vec![];
    for line in text.lines() {
        // The line after a header is a free-form comment.
        let is_comment = entries.last().map(|entry| entry.len() == 1).unwrap_or(false);
        if !is_comment && HEADER_RE.is_match(line.trim_start()) {
            entries.push(vec![line.trim()]);
        } else if let Some(entry) = entries.last_mut() {
            entry.push(line);
        } else if !line.trim().is_empty() {
            return Err(BasisError::parse(
                FORMAT,
                format!("expected an `ATOM:NAME` header, found `{}`", line.trim()),
            )
            .located(FORMAT, 0, line));
        }
    }
    Ok(entries)
}

fn decode_basis_set(text: &str) -> Result<BasisSet, BasisError> {
    split_entries(text)?
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            decode_entry(&entry).map_err(|err| err.located(FORMAT, i, &entry.join("\n")))
        })
        .collect()
}

/// Decodes one entry: its header line, its comment line, and the stream of numbers following.
fn decode_entry(lines: &[&str]) -> Result<Basis, BasisError> {
    let caps = HEADER_RE
        .captures(lines[0])
        .ok_or_else(|| BasisError::parse(FORMAT, "missing `ATOM:NAME` header"))?;
    let atom = &caps[1];
    let name = &caps[2];
    let tokens = lines
        .iter()
        .skip(2)
        .flat_map(|line| line.split_whitespace())
        .collect_vec();
    let count_mismatch = |what: &'static str, expected: usize| BasisError::CountMismatch {
        atom: atom.to_string(),
        what,
        expected,
        found: tokens.len(),
    };

    let nshells = parse_count::<usize>(
        FORMAT,
        tokens.first().ok_or_else(|| count_mismatch("numbers", 1))?,
    )?;
    let header_len = nshells
        .checked_mul(3)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| count_mismatch("numbers", usize::MAX))?;
    if tokens.len() < header_len {
        return Err(count_mismatch("numbers", header_len));
    }
    let counts = tokens[1..header_len]
        .iter()
        .map(|token| parse_count::<usize>(FORMAT, token))
        .collect::<Result<Vec<_>, _>>()?;
    let (ls, rest) = counts.split_at(nshells);
    let (nconts, nexps) = rest.split_at(nshells);
    let expected = nconts
        .iter()
        .zip(nexps)
        .try_fold(header_len, |total, (ncont, nexp)| {
            ncont
                .checked_add(1)
                .and_then(|n| n.checked_mul(*nexp))
                .and_then(|n| total.checked_add(n))
        })
        .ok_or_else(|| count_mismatch("numbers", usize::MAX))?;
    if tokens.len() != expected {
        return Err(count_mismatch("numbers", expected));
    }

    let mut numbers = tokens[header_len..]
        .iter()
        .map(|token| parse_float(FORMAT, token));
    let mut shells = Vec::with_capacity(nshells);
    // Every product below is bounded by the checked total.
    for ((l, ncont), nexp) in ls.iter().zip(nconts).zip(nexps) {
        let exponents = numbers.by_ref().take(*nexp).collect::<Result<Vec<_>, _>>()?;
        let rows = numbers
            .by_ref()
            .take(nexp * ncont)
            .collect::<Result<Vec<_>, _>>()?;
        let columns = (0..*ncont)
            .map(|j| (0..*nexp).map(|i| rows[i * ncont + j]).collect_vec())
            .collect_vec();
        shells.push(GenbasShell {
            l: u32::try_from(*l)
                .map_err(|_| BasisError::InvalidAngularMomentum(l.to_string()))?,
            exponents,
            columns,
        });
    }

    let functions = shells_to_functions(shells)?;
    let mut basis = Basis::new(atom, functions);
    if !name.is_empty() {
        basis.set_name(Some(name.to_string()));
    }
    Ok(basis)
}

/// Turns `GENBAS` shells into basis functions, one per column, merging an S shell followed by a
/// P shell on identical exponents into an `SP` function.
fn shells_to_functions(shells: Vec<GenbasShell>) -> Result<Vec<BasisFunction>, BasisError> {
    let mut functions = vec![];
    let mut shells = shells.into_iter().peekable();
    while let Some(shell) = shells.next() {
        let is_sp = shell.l == 0
            && shell.columns.len() == 1
            && shells
                .peek()
                .map(|next| {
                    next.l == 1 && next.columns.len() == 1 && next.exponents == shell.exponents
                })
                .unwrap_or(false);
        if is_sp {
            if let Some(p_shell) = shells.next() {
                let columns = shell.columns.into_iter().chain(p_shell.columns).collect_vec();
                functions.push(BasisFunction::from_parts(
                    AngularMomentum::SP,
                    shell.exponents,
                    columns,
                )?);
            }
            continue;
        }
        let angmom = AngularMomentum::from_index(shell.l)?;
        if shell.columns.is_empty() {
            return Err(BasisError::WrongCoefficientArity {
                angmom: angmom.to_string(),
                expected: 1,
                found: 0,
            });
        }
        for col in shell.columns {
            functions.push(BasisFunction::from_parts(
                angmom,
                shell.exponents.clone(),
                vec![col],
            )?);
        }
    }
    Ok(functions)
}

// ----
// ECPs
// ----

/// The label closing a channel header, one past the highest channel.
fn ul_label(l_max: u32) -> String {
    ANGMOM_LABELS
        .get(l_max as usize + 1)
        .map(|label| label.to_lowercase())
        .unwrap_or_else(|| "ul".to_string())
}

impl EcpCodec for CfourCodec {
    fn encode_ecp_function(
        &self,
        function: &EcpFunction,
        l_max: u32,
    ) -> Result<String, BasisError> {
        let mut out = format!("{}-{}\n", function.shell(), ul_label(l_max));
        function.terms().iter().for_each(|term| {
            out += &format!(
                "{:>14.8}{:>5}{:>14.8}\n",
                term.coefficient, term.power, term.exponent
            );
        });
        Ok(out)
    }

    fn encode_ecp(&self, ecp: &Ecp) -> Result<String, BasisError> {
        let mut out = format!(
            "*\n{}:ECP-{}\n*\n    NCORE = {:<2}     LMAX ={}\n",
            ecp.atom(),
            ecp.core_electrons(),
            ecp.core_electrons(),
            ecp.l_max()
        );
        for function in ecp.iter() {
            out += &self.encode_ecp_function(function, ecp.l_max())?;
        }
        out += "*\n";
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
    let mut set = EcpSet::new();
    let mut pos = 0;
    let mut chunk = 0;
    while pos < lines.len() {
        // An entry spans `*`, header, `*`, body, `*`.
        let end = lines[pos..]
            .iter()
            .enumerate()
            .filter(|(_, line)| **line == "*")
            .nth(2)
            .map(|(offset, _)| pos + offset + 1)
            .unwrap_or(lines.len());
        let entry = &lines[pos..end];
        let ecp =
            decode_ecp_entry(entry).map_err(|err| err.located(FORMAT, chunk, &entry.join("\n")))?;
        set.insert(ecp);
        pos = end;
        chunk += 1;
    }
    Ok(set)
}

fn decode_ecp_entry(lines: &[&str]) -> Result<Ecp, BasisError> {
    let (atom, ncore, lmax, body) = match lines {
        ["*", header, "*", ncore_line, body @ .., "*"] => {
            let atom = HEADER_RE
                .captures(header)
                .and_then(|caps| caps.get(1))
                .map(|atom| atom.as_str())
                .ok_or_else(|| {
                    BasisError::parse(
                        FORMAT,
                        format!("expected an `ATOM:ECP-n` header, found `{header}`"),
                    )
                })?;
            let caps = NCORE_RE.captures(ncore_line).ok_or_else(|| {
                BasisError::parse(
                    FORMAT,
                    format!("expected `NCORE = n  LMAX = l`, found `{ncore_line}`"),
                )
            })?;
            (
                atom,
                parse_count::<u32>(FORMAT, &caps[1])?,
                parse_count::<u32>(FORMAT, &caps[2])?,
                body,
            )
        }
        _ => {
            return Err(BasisError::parse(
                FORMAT,
                "expected an entry of the form `*`, `ATOM:ECP-n`, `*`, `NCORE = n  LMAX = l`, \
                 channels, `*`",
            ))
        }
    };

    let mut functions = vec![];
    let mut current: Option<(&str, Vec<EcpTerm>)> = None;
    for line in body {
        if let Some(caps) = ECP_CHANNEL_RE.captures(line) {
            if let Some((shell, terms)) = current.take() {
                functions.push(EcpFunction::new(shell, terms)?);
            }
            let shell = caps
                .get(1)
                .map(|shell| shell.as_str())
                .ok_or_else(|| BasisError::parse(FORMAT, "missing channel label"))?;
            current = Some((shell, vec![]));
            continue;
        }
        let (_, terms) = current.as_mut().ok_or_else(|| {
            BasisError::parse(FORMAT, format!("term `{line}` precedes any channel header"))
        })?;
        match line.split_whitespace().collect_vec().as_slice() {
            [coefficient, power, exponent] => terms.push(EcpTerm::new(
                parse_count(FORMAT, power)?,
                parse_float(FORMAT, exponent)?,
                parse_float(FORMAT, coefficient)?,
            )),
            _ => {
                return Err(BasisError::parse(
                    FORMAT,
                    format!("expected `coefficient power exponent`, found `{line}`"),
                ))
            }
        }
    }
    if let Some((shell, terms)) = current {
        functions.push(EcpFunction::new(shell, terms)?);
    }
    Ecp::new(atom, lmax, ncore, functions)
}
