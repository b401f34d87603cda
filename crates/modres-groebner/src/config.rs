//! Tuning knobs of the Buchberger drivers.

use std::path::PathBuf;

use crate::slice::{DirectorySlices, MemorySlices, SliceStore};

/// Where expansion slices live.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SliceBacking {
    /// Keep slices in memory.
    #[default]
    Memory,
    /// One subdirectory per Gröbner set below this directory.
    Directory(PathBuf),
}

impl SliceBacking {
    /// Opens a fresh store for the Gröbner set called `label`.
    #[must_use]
    pub fn open(&self, label: &str) -> Box<dyn SliceStore> {
        match self {
            SliceBacking::Memory => Box::new(MemorySlices::default()),
            SliceBacking::Directory(root) => Box::new(DirectorySlices::new(root.join(label))),
        }
    }
}

/// Configuration for FGS and RGS runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuchbergerConfig {
    /// Expansion rounds without progress after which an FGS fed by an
    /// RGS asks for more generators.
    pub max_unfruitful: usize,
    /// Unfruitful image rounds before the kernel gets a heady Buchberger.
    pub overshoot: usize,
    /// Maximum number of live general vectors per Gröbner set.
    pub vector_limit: usize,
    /// Expansion slice storage.
    pub slices: SliceBacking,
}

impl Default for BuchbergerConfig {
    fn default() -> Self {
        Self {
            max_unfruitful: 2,
            overshoot: 2,
            vector_limit: 1 << 20,
            slices: SliceBacking::Memory,
        }
    }
}

impl BuchbergerConfig {
    /// Sets the FGS patience.
    #[must_use]
    pub fn with_max_unfruitful(mut self, rounds: usize) -> Self {
        self.max_unfruitful = rounds;
        self
    }

    /// Sets the RGS patience.
    #[must_use]
    pub fn with_overshoot(mut self, rounds: usize) -> Self {
        self.overshoot = rounds;
        self
    }

    /// Caps the number of live general vectors.
    #[must_use]
    pub fn with_vector_limit(mut self, limit: usize) -> Self {
        self.vector_limit = limit;
        self
    }

    /// Chooses the slice storage.
    #[must_use]
    pub fn with_slices(mut self, slices: SliceBacking) -> Self {
        self.slices = slices;
        self
    }
}
