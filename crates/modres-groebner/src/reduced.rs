//! Reduced vectors and the append-only arena that owns them.
//!
//! Pattern nodes refer to their divisor by [`RvId`], so the trie and the
//! list of reduced vectors never own each other.

use std::fmt;

/// A handle to a reduced vector.
///
/// Handles are 32-bit indices in insertion order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RvId(u32);

impl RvId {
    /// Raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rv({})", self.0)
    }
}

/// An element of the partial Gröbner basis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReducedVector {
    /// Coordinates; monic at the leading term.
    pub w: Vec<u32>,
    /// Block of the leading term.
    pub block: usize,
    /// Pattern of the leading term.
    pub pattern: usize,
    /// Length of the leading pattern.
    pub dim: usize,
    /// All extensions of length below this have been produced.
    pub exp_dim: usize,
    /// True if the vector came from a generator rather than an expansion.
    pub heady: bool,
}

/// The reduced vectors of one Gröbner set, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ReducedList {
    rvs: Vec<ReducedVector>,
}

impl ReducedList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reduced vector.
    ///
    /// # Panics
    ///
    /// Panics if the arena outgrows 32-bit handles.
    pub fn push(&mut self, rv: ReducedVector) -> RvId {
        let index = self.rvs.len();
        assert!(index < u32::MAX as usize, "reduced vector arena exceeded");
        self.rvs.push(rv);
        RvId(index as u32)
    }

    /// Looks a vector up.
    #[must_use]
    pub fn get(&self, id: RvId) -> &ReducedVector {
        &self.rvs[id.index()]
    }

    /// Number of reduced vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rvs.len()
    }

    /// True if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rvs.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ReducedVector> {
        self.rvs.iter()
    }

    /// Iterates mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ReducedVector> {
        self.rvs.iter_mut()
    }

    /// Iterates with handles.
    pub fn enumerate(&self) -> impl Iterator<Item = (RvId, &ReducedVector)> {
        self.rvs
            .iter()
            .enumerate()
            .map(|(i, rv)| (RvId(i as u32), rv))
    }
}
