//! Gaussian basis functions, per-atom bases, and basis sets.

pub mod atom;
pub mod function;
pub mod set;

pub use atom::Basis;
pub use function::BasisFunction;
pub use set::{AngularConvention, BasisSet};
