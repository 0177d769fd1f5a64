//! # qbasis: Gaussian Basis Sets and ECPs across File Formats
//!
//! qbasis reads, manipulates and writes the Gaussian-type orbital basis sets and effective core
//! potentials used by quantum-chemistry programs. It provides:
//! - a validated data model of contracted basis functions, including shared-exponent `SP`
//!   shells and general contractions,
//! - per-atom and per-set containers with lookup, editing, decontraction and comparison up to a
//!   floating-point tolerance,
//! - codecs for the basis-set formats of Gaussian (`gaussian94`), GAMESS (`gamess`), BAGEL
//!   (`bagel`), CFOUR (`cfour`) and Molpro (`molpro`), and
//! - codecs for the ECP formats of Gaussian, GAMESS and CFOUR.
//!
//! This documentation details the public API of the `qbasis` crate.
//!
//! ## Getting started
//!
//! A basis set is decoded from text in one format and encoded into another:
//!
//! ```
//! use qbasis::basis::BasisSet;
//!
//! let gbs = "\
//! ****
//! H     0
//! S   2   1.00
//!       1.0000000              0.5000000
//!       2.0000000              0.5000000
//! ****
//! ";
//! let set = BasisSet::decode(gbs, "gaussian94").unwrap();
//! let gamess = set.encode("gamess").unwrap();
//! assert!(gamess.starts_with("H\nS     2\n"));
//! assert_eq!(BasisSet::decode(&gamess, "gamess").unwrap(), set);
//! ```
//!
//! Decoding failures are reported as [`error::BasisError::Parse`] values locating the
//! offending chunk of the input.
//!
//! ## Program
//!
//! The `qbasis` binary runs the conversions listed in a YAML configuration file:
//!
//! ```yaml
//! conversions:
//!   - source: def2-svp.gbs
//!     source_format: gaussian94
//!     target: GENBAS
//!     target_format: cfour
//!     decontract: false
//!   - kind: Ecp
//!     source: def2-ecp.gbs
//!     source_format: gaussian94
//!     target_format: gamess
//! ```
//!
//! Run without `--config`, it writes a template configuration file instead.

pub mod angmom;
pub mod basis;
pub mod drivers;
pub mod ecp;
pub mod error;
pub mod interfaces;
pub mod io;
