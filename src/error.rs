//! Errors raised while building, transforming, and (de)serialising basis sets and ECPs.

use std::error::Error;
use std::fmt;

use itertools::Itertools;

/// The number of leading lines of an offending chunk retained in a [`ParseError`].
pub const PARSE_CONTEXT_LINES: usize = 5;

// ----------
// ParseError
// ----------

/// Structure describing a malformed chunk of text encountered during decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// The name of the format being decoded.
    pub format: String,

    /// The 0-based index of the offending chunk (atom block, shell, ...), if known.
    pub chunk: Option<usize>,

    /// A description of what went wrong.
    pub message: String,

    /// The first few lines of the offending chunk.
    pub context: Vec<String>,

    /// The model-level error that made the chunk invalid, if any.
    pub cause: Option<Box<BasisError>>,
}

impl ParseError {
    /// Constructs a new [`ParseError`] without chunk information.
    pub fn new(format: &str, message: impl Into<String>) -> Self {
        Self {
            format: format.to_string(),
            chunk: None,
            message: message.into(),
            context: Vec::new(),
            cause: None,
        }
    }

    /// Attaches the index and the leading lines of the offending chunk, keeping any chunk
    /// information already recorded closer to the failure.
    pub fn in_chunk(mut self, chunk: usize, text: &str) -> Self {
        if self.chunk.is_none() {
            self.chunk = Some(chunk);
        }
        if self.context.is_empty() {
            self.context = text
                .lines()
                .take(PARSE_CONTEXT_LINES)
                .map(str::to_string)
                .collect_vec();
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to parse {} input", self.format)?;
        if let Some(chunk) = self.chunk {
            write!(f, " (chunk {chunk})")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ----------
// BasisError
// ----------

/// Errors produced by the basis-set and ECP model and its codecs.
#[derive(Clone, Debug, PartialEq)]
pub enum BasisError {
    /// An angular-momentum label outside `SPDFGHIKLMN` (or the composite `SP`).
    InvalidAngularMomentum(String),

    /// Columns (or a row) whose length disagrees with what is required.
    LengthMismatch { expected: usize, found: usize },

    /// An exponent that is not a finite positive number.
    NonPositiveExponent(f64),

    /// A coefficient column count that does not suit the angular momentum.
    WrongCoefficientArity {
        angmom: String,
        expected: usize,
        found: usize,
    },

    /// A format name that no codec handles.
    UnsupportedFormat(String),

    /// A malformed chunk of input text.
    Parse(ParseError),

    /// An atom symbol absent from a set.
    AtomNotFound(String),

    /// Counts declared in a cfour header that disagree with the numbers actually present.
    CountMismatch {
        atom: String,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// An index past the end of a sequence.
    IndexOutOfRange { index: usize, len: usize },

    /// Failure of an underlying serialiser.
    Serialisation(String),
}

impl BasisError {
    /// Shorthand for a [`BasisError::Parse`] without chunk information.
    pub(crate) fn parse(format: &str, message: impl Into<String>) -> Self {
        BasisError::Parse(ParseError::new(format, message))
    }

    /// Turns this error into one located in a particular chunk of `format` input.
    ///
    /// Parse errors gain the chunk index and context, count mismatches are kept as they are, and
    /// model validation errors are wrapped into a parse error carrying them as their cause.
    pub(crate) fn located(self, format: &str, chunk: usize, text: &str) -> Self {
        match self {
            BasisError::Parse(err) => BasisError::Parse(err.in_chunk(chunk, text)),
            err @ (BasisError::CountMismatch { .. } | BasisError::UnsupportedFormat(_)) => err,
            err => {
                let mut parse_err = ParseError::new(format, err.to_string()).in_chunk(chunk, text);
                parse_err.cause = Some(Box::new(err));
                BasisError::Parse(parse_err)
            }
        }
    }
}

impl fmt::Display for BasisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAngularMomentum(label) => {
                write!(f, "invalid angular momentum `{label}`")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "length mismatch: expected {expected}, found {found}")
            }
            Self::NonPositiveExponent(exp) => {
                write!(f, "exponents must be greater than 0, found {exp}")
            }
            Self::WrongCoefficientArity {
                angmom,
                expected,
                found,
            } => write!(
                f,
                "{angmom} functions need {expected} coefficient column(s), found {found}"
            ),
            Self::UnsupportedFormat(format) => write!(f, "unsupported format `{format}`"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::AtomNotFound(atom) => write!(f, "atom `{atom}` not found"),
            Self::CountMismatch {
                atom,
                what,
                expected,
                found,
            } => write!(
                f,
                "count mismatch for {atom}: header declares {expected} {what}, found {found}"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::Serialisation(msg) => write!(f, "serialisation failed: {msg}"),
        }
    }
}

impl Error for BasisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(ParseError {
                cause: Some(cause), ..
            }) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<ParseError> for BasisError {
    fn from(err: ParseError) -> Self {
        BasisError::Parse(err)
    }
}
