//! Error types shared by the resolution crates.

use std::fmt;
use std::io;

use modres_field::FieldError;
use thiserror::Error;

/// Coarse classification of a failure.
///
/// Every failure is fatal to the current run; the kind only tells the
/// caller what went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input fields are inconsistent or out of range.
    InputMalformed,
    /// A resource limit (vectors, words, disk) was exceeded.
    ResourceExhausted,
    /// An internal consistency check failed.
    InvariantViolation,
    /// Arithmetic produced an ill-defined result.
    ArithmeticFailure,
    /// The file system failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InputMalformed => "input malformed",
            ErrorKind::ResourceExhausted => "resource exhausted",
            ErrorKind::InvariantViolation => "invariant violation",
            ErrorKind::ArithmeticFailure => "arithmetic failure",
            ErrorKind::Io => "i/o failure",
        };
        f.write_str(name)
    }
}

/// Errors raised while reading, writing or building a basic algebra.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed {field}: {value}")]
    Malformed { field: &'static str, value: i64 },

    #[error("unknown ordering '{0}'")]
    UnknownOrdering(char),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("inconsistent basic algebra: {0}")]
    Inconsistent(String),

    #[error("more than {0} nonzero words")]
    TooManyWords(usize),
}

impl GroupError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GroupError::Io(_) => ErrorKind::Io,
            GroupError::TooManyWords(_) => ErrorKind::ResourceExhausted,
            GroupError::Malformed { .. }
            | GroupError::UnknownOrdering(_)
            | GroupError::Field(_)
            | GroupError::Inconsistent(_) => ErrorKind::InputMalformed,
        }
    }

    pub(crate) fn malformed(field: &'static str, value: impl TryInto<i64>) -> Self {
        GroupError::Malformed {
            field,
            value: value.try_into().unwrap_or(i64::MAX),
        }
    }
}
