//! Where a resolution keeps its files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stable paths of the artifacts of one resolution: everything lives in
/// `<root>/<stem>/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionStore {
    root: PathBuf,
    stem: String,
}

impl ResolutionStore {
    /// A store for the group called `stem` below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            stem: stem.into(),
        }
    }

    /// The directory holding every file of this resolution.
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.stem)
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The group stem.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// File of the differential `d_n`.
    #[must_use]
    pub fn differential_file(&self, n: usize) -> PathBuf {
        self.dir().join(format!("d{n}.bin"))
    }

    /// File of the urbild Gröbner basis of `d_n`.
    #[must_use]
    pub fn urbild_gb_file(&self, n: usize) -> PathBuf {
        self.dir().join(format!("urbildGB{n}.bin"))
    }

    /// Scratch directory for the expansion slices of step `n`.
    #[must_use]
    pub fn slice_dir(&self, n: usize) -> PathBuf {
        self.dir().join("slices").join(format!("d{n}"))
    }

    /// Creates the store directory.
    ///
    /// # Errors
    ///
    /// Propagates file-system errors.
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(self.dir())
    }
}

impl Default for ResolutionStore {
    fn default() -> Self {
        Self::new(".", "group")
    }
}
