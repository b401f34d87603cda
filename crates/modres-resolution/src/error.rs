//! Errors of the resolution layer.

use std::io;

use modres_algebra::{ErrorKind, GroupError};
use modres_groebner::BuchbergerError;
use thiserror::Error;

/// Errors raised while computing or persisting a resolution.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Buchberger(#[from] BuchbergerError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("vector is not in the image of d_{degree}")]
    NotInImage { degree: usize },

    #[error("d_{degree} has not been computed")]
    NotComputed { degree: usize },

    #[error("vector of length {found} where {expected} was expected")]
    WidthMismatch { expected: usize, found: usize },

    #[error("stored differential is over F_{found}, expected F_{expected}")]
    WrongCharacteristic { expected: u32, found: u32 },
}

impl ResolutionError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolutionError::Group(e) => e.kind(),
            ResolutionError::Buchberger(e) => e.kind(),
            ResolutionError::Io(_) => ErrorKind::Io,
            ResolutionError::NotInImage { .. } | ResolutionError::NotComputed { .. } => {
                ErrorKind::InvariantViolation
            }
            ResolutionError::WidthMismatch { .. } | ResolutionError::WrongCharacteristic { .. } => {
                ErrorKind::InputMalformed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_pass_through() {
        let e = ResolutionError::from(BuchbergerError::RankMismatch {
            expected: 2,
            found: 3,
        });
        assert_eq!(e.kind(), ErrorKind::InvariantViolation);
        let e = ResolutionError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.kind(), ErrorKind::Io);
        let e = ResolutionError::NotComputed { degree: 3 };
        assert_eq!(e.to_string(), "d_3 has not been computed");
    }
}
