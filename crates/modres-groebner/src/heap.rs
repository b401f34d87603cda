//! The queue of vectors awaiting reduction.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::vector::GeneralVector;

/// Heap key: leading dimension, then pattern, then block, then arrival.
type Key = (usize, usize, usize, u64);

#[derive(Debug)]
struct Entry {
    key: Key,
    gv: GeneralVector,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap of unreduced vectors.
///
/// Arrival numbers make the pop order total, so replayed runs pop in the
/// same order.
#[derive(Debug, Default)]
pub struct UnreducedHeap {
    heap: BinaryHeap<Reverse<Entry>>,
    arrivals: u64,
}

impl UnreducedHeap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a vector under its current lead metadata.
    pub fn push(&mut self, gv: GeneralVector) {
        self.arrivals += 1;
        let key = (gv.dim, gv.pattern, gv.block, self.arrivals);
        self.heap.push(Reverse(Entry { key, gv }));
    }

    /// Removes the vector with the smallest key.
    pub fn pop(&mut self) -> Option<GeneralVector> {
        self.heap.pop().map(|Reverse(entry)| entry.gv)
    }

    /// Number of queued vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
