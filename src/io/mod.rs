//! Reading and writing basis-set files, ECP files, and `qbasis` configuration files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{self, format_err};
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml;

use crate::basis::BasisSet;
use crate::ecp::EcpSet;
use crate::interfaces::{BasisFormat, EcpFormat};

pub(crate) mod format;

/// Returns the part of a file name before its first `.`, used as the name of the set read from
/// it.
fn set_name<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Reads a basis-set file.
///
/// # Arguments
///
/// * `path` - The path of the file to be read in.
/// * `format` - The format of the file.
/// * `debug` - Boolean indicating if a malformed chunk is to be logged before the error is
/// returned.
///
/// # Returns
///
/// A `Result` containing the basis set, named after the file stem.
pub fn read_basis_set<P: AsRef<Path>>(
    path: P,
    format: BasisFormat,
    debug: bool,
) -> Result<BasisSet, anyhow::Error> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|err| format_err!("Unable to read `{}`: {err}", path.as_ref().display()))?;
    let mut set = BasisSet::decode_as(&text, format, debug)?;
    set.name = set_name(path);
    Ok(set)
}

/// Encodes a basis set and writes it to a file.
///
/// # Returns
///
/// A `Result` indicating if the encoding and writing processes have been successful.
pub fn write_basis_set<P: AsRef<Path>>(
    path: P,
    set: &BasisSet,
    format: BasisFormat,
) -> Result<(), anyhow::Error> {
    let text = set.encode_as(format)?;
    fs::write(path.as_ref(), text)
        .map_err(|err| format_err!("Unable to write `{}`: {err}", path.as_ref().display()))
}

/// Reads an ECP file. See [`read_basis_set`].
pub fn read_ecp_set<P: AsRef<Path>>(
    path: P,
    format: EcpFormat,
    debug: bool,
) -> Result<EcpSet, anyhow::Error> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|err| format_err!("Unable to read `{}`: {err}", path.as_ref().display()))?;
    let mut set = EcpSet::decode_as(&text, format, debug)?;
    set.name = set_name(path);
    Ok(set)
}

/// Encodes an ECP set and writes it to a file.
pub fn write_ecp_set<P: AsRef<Path>>(
    path: P,
    set: &EcpSet,
    format: EcpFormat,
) -> Result<(), anyhow::Error> {
    let text = set.encode_as(format)?;
    fs::write(path.as_ref(), text)
        .map_err(|err| format_err!("Unable to write `{}`: {err}", path.as_ref().display()))
}

/// Reads a `qbasis` configuration YAML file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_qbasis_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(name).map_err(|err| format_err!(err))?);
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes into a `qbasis` configuration YAML file.
///
/// # Arguments
///
/// * `name` - The name of the YAML file to be written (without extensions). The resulting file
/// will have the `.yml` extension.
pub fn write_qbasis_yaml<T, P: AsRef<Path>>(name: P, value: &T) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension("yml");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_yaml::to_writer(&mut writer, value).map_err(|err| format_err!(err))
}
