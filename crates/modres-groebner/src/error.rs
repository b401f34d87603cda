//! Errors of the Buchberger engine.

use std::io;

use modres_algebra::ErrorKind;
use thiserror::Error;

/// Errors that abort a Buchberger run.
///
/// None of them is recoverable; the driver destroys its expansion slices
/// and hands the error to the caller.
#[derive(Debug, Error)]
pub enum BuchbergerError {
    #[error("vector pool exhausted: more than {limit} live vectors")]
    PoolExhausted { limit: usize },

    #[error("expansion slice i/o failed: {0}")]
    Slice(#[from] io::Error),

    #[error("Buchberger entered on a set that requires none")]
    NoBuchbergerRequired,

    #[error("theoretical error: kernel leaves {found} monomials uncovered, expected {expected}")]
    RankMismatch { expected: usize, found: usize },

    #[error("zero pivot at block {block}, pattern {pattern}")]
    ZeroPivot { block: usize, pattern: usize },

    #[error("vector of length {found} where {expected} was expected")]
    WidthMismatch { expected: usize, found: usize },

    #[error("minimal generators requested before the Buchberger run finished")]
    NotFinished,

    #[error("internal inconsistency: {0}")]
    Inconsistent(String),
}

impl BuchbergerError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuchbergerError::PoolExhausted { .. } | BuchbergerError::Slice(_) => {
                ErrorKind::ResourceExhausted
            }
            BuchbergerError::NoBuchbergerRequired
            | BuchbergerError::RankMismatch { .. }
            | BuchbergerError::NotFinished
            | BuchbergerError::Inconsistent(_) => ErrorKind::InvariantViolation,
            BuchbergerError::ZeroPivot { .. } => ErrorKind::ArithmeticFailure,
            BuchbergerError::WidthMismatch { .. } => ErrorKind::InputMalformed,
        }
    }
}
