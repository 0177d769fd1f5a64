//! Contracted Gaussian basis functions.

use std::fmt;
use std::iter;

use itertools::Itertools;
use ndarray::Array2;
use ordered_float::OrderedFloat;

use crate::angmom::AngularMomentum;
use crate::error::BasisError;
use crate::interfaces::BasisFormat;

#[cfg(test)]
#[path = "function_tests.rs"]
mod function_tests;

/// Relative tolerance used when comparing numerical columns of basis functions and ECPs.
pub const RELATIVE_TOLERANCE: f64 = 1.0e-5;

/// Absolute tolerance used when comparing numerical columns of basis functions and ECPs.
pub const ABSOLUTE_TOLERANCE: f64 = 1.0e-8;

/// Number of significant figures retained in the canonical deduplication key of an exponent.
const CANONICAL_SIGNIFICANT_FIGURES: i32 = 10;

/// Compares two floating-point values within [`RELATIVE_TOLERANCE`] and [`ABSOLUTE_TOLERANCE`].
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    approx::relative_eq!(
        a,
        b,
        epsilon = ABSOLUTE_TOLERANCE,
        max_relative = RELATIVE_TOLERANCE
    )
}

/// Compares two slices element-wise with [`approx_eq`].
pub(crate) fn approx_eq_slices(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y))
}

/// Checks that an exponent is a finite positive number.
pub(crate) fn check_exponent(exponent: f64) -> Result<(), BasisError> {
    if exponent.is_finite() && exponent > 0.0 {
        Ok(())
    } else {
        Err(BasisError::NonPositiveExponent(exponent))
    }
}

/// Rounds a positive value to [`CANONICAL_SIGNIFICANT_FIGURES`] significant figures.
fn canonical_value(x: f64) -> OrderedFloat<f64> {
    let magnitude = x.abs().log10().floor() as i32;
    let scale = 10f64.powi(CANONICAL_SIGNIFICANT_FIGURES - 1 - magnitude);
    OrderedFloat((x * scale).round() / scale)
}

// -------------
// BasisFunction
// -------------

/// Structure representing a contracted (or primitive) Gaussian shell: an angular-momentum tag,
/// an ordered list of exponents, and one coefficient column per component of the tag.
///
/// A [`BasisFunction`] is validated on construction and can never hold an empty, ragged, or
/// non-positive set of primitives.
#[derive(Clone, Debug)]
pub struct BasisFunction {
    /// The angular-momentum tag of this shell.
    angmom: AngularMomentum,

    /// The exponents of the primitives.
    exponents: Vec<f64>,

    /// The contraction coefficients, one column per component of [`Self::angmom`], each as long
    /// as [`Self::exponents`].
    coefficients: Vec<Vec<f64>>,
}

impl BasisFunction {
    /// Constructs a new [`BasisFunction`] from an angular-momentum label.
    ///
    /// # Arguments
    ///
    /// * `angmom` - The angular-momentum label, *e.g.* `"S"`, `"d"`, or `"SP"`.
    /// * `exponents` - The exponents of the primitives.
    /// * `coefficients` - The coefficient columns: two for `SP`, one otherwise.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::InvalidAngularMomentum`] for an unknown label,
    /// [`BasisError::LengthMismatch`] for empty or unequal columns,
    /// [`BasisError::WrongCoefficientArity`] for the wrong number of coefficient columns, and
    /// [`BasisError::NonPositiveExponent`] for an exponent that is not greater than zero.
    pub fn new(
        angmom: &str,
        exponents: Vec<f64>,
        coefficients: Vec<Vec<f64>>,
    ) -> Result<Self, BasisError> {
        Self::from_parts(angmom.parse()?, exponents, coefficients)
    }

    /// Constructs a new single-column [`BasisFunction`].
    pub fn contracted(
        angmom: &str,
        exponents: Vec<f64>,
        coefficients: Vec<f64>,
    ) -> Result<Self, BasisError> {
        Self::new(angmom, exponents, vec![coefficients])
    }

    /// Constructs a new `SP` [`BasisFunction`] from its shared exponents and its S and P
    /// coefficient columns.
    pub fn sp(
        exponents: Vec<f64>,
        s_coefficients: Vec<f64>,
        p_coefficients: Vec<f64>,
    ) -> Result<Self, BasisError> {
        Self::from_parts(
            AngularMomentum::SP,
            exponents,
            vec![s_coefficients, p_coefficients],
        )
    }

    /// Constructs a new [`BasisFunction`] from an already parsed angular momentum.
    ///
    /// # Errors
    ///
    /// See [`Self::new`]. A [`AngularMomentum::Single`] index beyond the label alphabet fails
    /// with [`BasisError::InvalidAngularMomentum`].
    pub fn from_parts(
        angmom: AngularMomentum,
        exponents: Vec<f64>,
        coefficients: Vec<Vec<f64>>,
    ) -> Result<Self, BasisError> {
        if let Some(l) = angmom.index() {
            AngularMomentum::from_index(l)?;
        }
        if exponents.is_empty() {
            return Err(BasisError::LengthMismatch {
                expected: 1,
                found: 0,
            });
        }
        let ncols = angmom.n_coefficient_columns();
        if coefficients.len() != ncols {
            return Err(BasisError::WrongCoefficientArity {
                angmom: angmom.to_string(),
                expected: ncols,
                found: coefficients.len(),
            });
        }
        if let Some(col) = coefficients.iter().find(|col| col.len() != exponents.len()) {
            return Err(BasisError::LengthMismatch {
                expected: exponents.len(),
                found: col.len(),
            });
        }
        exponents.iter().try_for_each(|exp| check_exponent(*exp))?;
        Ok(Self {
            angmom,
            exponents,
            coefficients,
        })
    }

    /// A single-primitive function with unit coefficient. The exponent must already have been
    /// validated.
    fn primitive(angmom: AngularMomentum, exponent: f64) -> Self {
        Self {
            angmom,
            exponents: vec![exponent],
            coefficients: vec![vec![1.0]],
        }
    }

    /// The angular-momentum tag of this function.
    pub fn angmom(&self) -> AngularMomentum {
        self.angmom
    }

    /// The exponents of the primitives.
    pub fn exponents(&self) -> &[f64] {
        &self.exponents
    }

    /// The coefficient columns.
    pub fn coefficients(&self) -> &[Vec<f64>] {
        &self.coefficients
    }

    /// The number of coefficient columns.
    pub fn ncols(&self) -> usize {
        self.coefficients.len()
    }

    /// The number of primitives.
    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    /// Always `false`, since a validated function has at least one primitive.
    pub fn is_empty(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Returns the `i`th primitive as a row `[exponent, c1(, c2)]`.
    pub fn get(&self, i: usize) -> Option<Vec<f64>> {
        self.exponents.get(i).map(|exp| {
            iter::once(*exp)
                .chain(self.coefficients.iter().map(|col| col[i]))
                .collect_vec()
        })
    }

    /// Iterates over the primitives as rows `[exponent, c1(, c2)]`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// Replaces the `i`th primitive with a row `[exponent, c1(, c2)]`.
    ///
    /// # Errors
    ///
    /// Errors if `i` is out of range, if the row does not hold exactly one exponent plus one
    /// value per coefficient column, or if the exponent is not positive. The function is left
    /// unchanged on error.
    pub fn set(&mut self, i: usize, row: &[f64]) -> Result<(), BasisError> {
        if i >= self.len() {
            return Err(BasisError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        if row.len() != self.ncols() + 1 {
            return Err(BasisError::LengthMismatch {
                expected: self.ncols() + 1,
                found: row.len(),
            });
        }
        check_exponent(row[0])?;
        self.exponents[i] = row[0];
        self.coefficients
            .iter_mut()
            .zip(row[1..].iter())
            .for_each(|(col, c)| col[i] = *c);
        Ok(())
    }

    /// Decontracts this function into single-primitive functions with unit coefficients, one
    /// per exponent. An `SP` function yields its S primitives followed by its P primitives.
    ///
    /// The returned iterator borrows `self` and can be recreated at will.
    pub fn decontracted(&self) -> impl Iterator<Item = BasisFunction> + '_ {
        self.angmom
            .components()
            .into_iter()
            .flat_map(move |angmom| {
                self.exponents
                    .iter()
                    .map(move |exp| BasisFunction::primitive(angmom, *exp))
            })
    }

    /// The key identifying this function for deduplication purposes: its tag and its exponents
    /// rounded to a fixed number of significant figures. Coefficients do not take part.
    pub(crate) fn canonical_key(&self) -> (AngularMomentum, Vec<OrderedFloat<f64>>) {
        (
            self.angmom,
            self.exponents.iter().map(|exp| canonical_value(*exp)).collect(),
        )
    }

    /// The primitives of this function as an array whose rows are `[exponent, c1(, c2)]`.
    pub fn values(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), self.ncols() + 1), |(i, j)| {
            if j == 0 {
                self.exponents[i]
            } else {
                self.coefficients[j - 1][i]
            }
        })
    }

    /// Serialises this function on its own in a named format.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::UnsupportedFormat`] if no codec is known for `format`.
    pub fn print(&self, format: &str) -> Result<String, BasisError> {
        self.print_as(format.parse()?)
    }

    /// Serialises this function on its own in a given format.
    pub fn print_as(&self, format: BasisFormat) -> Result<String, BasisError> {
        format.codec().encode_function(self, "")
    }
}

impl PartialEq for BasisFunction {
    fn eq(&self, other: &Self) -> bool {
        self.angmom == other.angmom
            && approx_eq_slices(&self.exponents, &other.exponents)
            && self.coefficients.len() == other.coefficients.len()
            && self
                .coefficients
                .iter()
                .zip(other.coefficients.iter())
                .all(|(s_col, o_col)| approx_eq_slices(s_col, o_col))
    }
}

impl fmt::Display for BasisFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<BasisFunction {} {}{}>",
            self.angmom,
            self.len(),
            if self.ncols() > 1 {
                format!("x{}", self.ncols())
            } else {
                String::new()
            }
        )
    }
}
