//! Orderings on paths of the quiver.
//!
//! The ordering fixes the pattern enumeration of the nontips and hence the
//! leading terms of every vector the engine sees.

use std::cmp::Ordering;

use crate::error::GroupError;

/// An admissible ordering on words in the arrows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum PathOrdering {
    /// Length first, then words compared from the right.
    #[default]
    ReverseLengthLex,

    /// Length first, then words compared from the left.
    LengthLex,

    /// Jennings weight first (each arrow weighs its Jennings dimension),
    /// then words compared from the left.
    Jennings,
}

impl PathOrdering {
    /// Decodes the ordering byte of a `.nontips` header.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::UnknownOrdering`] for anything but `R`, `L`, `J`.
    pub fn from_byte(byte: u8) -> Result<Self, GroupError> {
        match byte {
            b'R' => Ok(PathOrdering::ReverseLengthLex),
            b'L' => Ok(PathOrdering::LengthLex),
            b'J' => Ok(PathOrdering::Jennings),
            other => Err(GroupError::UnknownOrdering(char::from(other))),
        }
    }

    /// The header byte.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            PathOrdering::ReverseLengthLex => b'R',
            PathOrdering::LengthLex => b'L',
            PathOrdering::Jennings => b'J',
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            PathOrdering::ReverseLengthLex => "Reverse length lexicographical",
            PathOrdering::LengthLex => "Length lexicographical",
            PathOrdering::Jennings => "Jennings",
        }
    }

    /// True if arrows carry individual weights.
    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        matches!(self, PathOrdering::Jennings)
    }

    /// Length of a word: the number of letters, or the sum of the arrow
    /// weights for a weighted ordering.
    #[must_use]
    pub fn weight(&self, word: &[u8], dims: &[u32]) -> usize {
        if self.is_weighted() {
            word.iter().map(|&a| dims[usize::from(a)] as usize).sum()
        } else {
            word.len()
        }
    }

    /// Compares two words.
    ///
    /// Smaller words come first in the pattern enumeration.
    #[must_use]
    pub fn compare(&self, a: &[u8], b: &[u8], dims: &[u32]) -> Ordering {
        self.weight(a, dims)
            .cmp(&self.weight(b, dims))
            .then_with(|| match self {
                PathOrdering::ReverseLengthLex => a.len().cmp(&b.len()).then_with(|| a.iter().rev().cmp(b.iter().rev())),
                PathOrdering::LengthLex | PathOrdering::Jennings => {
                    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
                }
            })
    }
}

impl std::fmt::Display for PathOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_dominates() {
        for order in [PathOrdering::ReverseLengthLex, PathOrdering::LengthLex] {
            assert_eq!(order.compare(&[1], &[0, 0], &[1, 1]), Ordering::Less);
            assert_eq!(order.compare(&[], &[0], &[1, 1]), Ordering::Less);
        }
    }

    #[test]
    fn test_tie_breaks() {
        // xy against yx
        let xy = [0u8, 1];
        let yx = [1u8, 0];
        assert_eq!(PathOrdering::LengthLex.compare(&xy, &yx, &[]), Ordering::Less);
        assert_eq!(PathOrdering::ReverseLengthLex.compare(&xy, &yx, &[]), Ordering::Greater);
    }

    #[test]
    fn test_jennings_weights() {
        let dims = [1, 2];
        // y weighs 2, as much as xx
        assert_eq!(PathOrdering::Jennings.compare(&[1], &[0, 0], &dims), Ordering::Less);
        assert_eq!(PathOrdering::Jennings.compare(&[0, 1], &[1, 0], &dims), Ordering::Less);
        assert_eq!(PathOrdering::Jennings.weight(&[0, 1, 1], &dims), 5);
    }

    #[test]
    fn test_compatible_with_right_multiplication() {
        let words: [&[u8]; 5] = [&[0], &[1], &[0, 1], &[1, 0], &[1, 1]];
        for order in [PathOrdering::ReverseLengthLex, PathOrdering::LengthLex, PathOrdering::Jennings] {
            for m in words {
                for n in words {
                    if order.compare(m, n, &[1, 2]) == Ordering::Less {
                        let mut ma = m.to_vec();
                        let mut na = n.to_vec();
                        ma.push(1);
                        na.push(1);
                        assert_eq!(order.compare(&ma, &na, &[1, 2]), Ordering::Less);
                    }
                }
            }
        }
    }

    #[test]
    fn test_header_byte() {
        assert_eq!(PathOrdering::from_byte(b'J').unwrap(), PathOrdering::Jennings);
        assert_eq!(PathOrdering::LengthLex.as_byte(), b'L');
        assert!(PathOrdering::from_byte(b'X').is_err());
    }
}
