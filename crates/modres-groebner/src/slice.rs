//! Expansion slices: node vectors paged by length.
//!
//! While expanding length `d` the engine computes the node vectors of the
//! children it passes through. Those are written to the store under their
//! own length and read back when the sweep reaches it. A node vector that
//! is not in memory is recomputed from its divisor, so the store only
//! saves work and never decides results.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use modres_algebra::Group;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::BuchbergerError;
use crate::pattern::{PatternTrie, ROOT};
use crate::reduced::ReducedList;

/// A node vector on its way to or from a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceEntry {
    /// Block of the node.
    pub block: usize,
    /// Pattern of the node.
    pub pattern: usize,
    /// The node vector.
    pub w: Vec<u32>,
}

/// Storage for expansion slices, FIFO per length.
pub trait SliceStore: Send {
    /// Appends entries to the slice of length `dim`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn save(&mut self, dim: usize, entries: Vec<SliceEntry>) -> io::Result<()>;

    /// Removes and returns the slice of length `dim` (empty if none).
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn load(&mut self, dim: usize) -> io::Result<Vec<SliceEntry>>;

    /// Drops every slice and releases the storage.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn destroy(&mut self) -> io::Result<()>;
}

/// Slices kept in memory.
#[derive(Debug, Default)]
pub struct MemorySlices {
    slices: BTreeMap<usize, Vec<SliceEntry>>,
}

impl SliceStore for MemorySlices {
    fn save(&mut self, dim: usize, entries: Vec<SliceEntry>) -> io::Result<()> {
        self.slices.entry(dim).or_default().extend(entries);
        Ok(())
    }

    fn load(&mut self, dim: usize) -> io::Result<Vec<SliceEntry>> {
        Ok(self.slices.remove(&dim).unwrap_or_default())
    }

    fn destroy(&mut self) -> io::Result<()> {
        self.slices.clear();
        Ok(())
    }
}

/// Slices stored as `slice-<dim>.bin` files in one directory.
///
/// Each entry is `block`, `pattern`, `len` as little-endian `u64`
/// followed by `len` little-endian `u32`. The directory is created on
/// first use and removed by [`SliceStore::destroy`].
#[derive(Debug)]
pub struct DirectorySlices {
    dir: PathBuf,
}

impl DirectorySlices {
    /// Uses `dir` for slice files.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The slice directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, dim: usize) -> PathBuf {
        self.dir.join(format!("slice-{dim}.bin"))
    }
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<Option<u64>> {
    let mut buf = [0u8; 8];
    match reader.read_exact(&mut buf) {
        Ok(()) => Ok(Some(u64::from_le_bytes(buf))),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

fn corrupt() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "truncated slice entry")
}

impl SliceStore for DirectorySlices {
    fn save(&mut self, dim: usize, entries: Vec<SliceEntry>) -> io::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file(dim))?;
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writer.write_all(&(entry.block as u64).to_le_bytes())?;
            writer.write_all(&(entry.pattern as u64).to_le_bytes())?;
            writer.write_all(&(entry.w.len() as u64).to_le_bytes())?;
            for x in entry.w {
                writer.write_all(&x.to_le_bytes())?;
            }
        }
        writer.flush()
    }

    fn load(&mut self, dim: usize) -> io::Result<Vec<SliceEntry>> {
        let path = self.file(dim);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        while let Some(block) = read_u64(&mut reader)? {
            let pattern = read_u64(&mut reader)?.ok_or_else(corrupt)?;
            let len = read_u64(&mut reader)?.ok_or_else(corrupt)?;
            let len = len.checked_mul(4).ok_or_else(corrupt)?;
            let mut bytes = Vec::new();
            (&mut reader).take(len).read_to_end(&mut bytes)?;
            if bytes.len() as u64 != len {
                return Err(corrupt());
            }
            let w = bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            entries.push(SliceEntry {
                block: usize::try_from(block).map_err(|_| corrupt())?,
                pattern: usize::try_from(pattern).map_err(|_| corrupt())?,
                w,
            });
        }
        fs::remove_file(&path)?;
        Ok(entries)
    }

    fn destroy(&mut self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// The in-memory window onto the node vectors of one Gröbner set.
pub struct ExpansionSlice {
    current: FxHashMap<(usize, usize), Vec<u32>>,
    pending: Vec<(usize, SliceEntry)>,
    store: Box<dyn SliceStore>,
}

impl std::fmt::Debug for ExpansionSlice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpansionSlice")
            .field("current", &self.current.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl ExpansionSlice {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: Box<dyn SliceStore>) -> Self {
        Self {
            current: FxHashMap::default(),
            pending: Vec::new(),
            store,
        }
    }

    /// Number of node vectors held in memory.
    #[must_use]
    pub fn resident(&self) -> usize {
        self.current.len()
    }

    /// Brings the slice of length `dim` into memory.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn load(&mut self, dim: usize) -> Result<(), BuchbergerError> {
        for entry in self.store.load(dim)? {
            self.current.insert((entry.block, entry.pattern), entry.w);
        }
        Ok(())
    }

    /// Remembers a node vector of length `dim` for a later sweep.
    pub fn stash(&mut self, dim: usize, entry: SliceEntry) {
        self.pending.push((dim, entry));
    }

    /// Persists the stashed vectors and evicts those shorter than `dim`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn increment(&mut self, dim: usize, group: &Group) -> Result<(), BuchbergerError> {
        let mut by_dim: BTreeMap<usize, Vec<SliceEntry>> = BTreeMap::new();
        for (d, entry) in self.pending.drain(..) {
            by_dim.entry(d).or_default().push(entry);
        }
        for (d, entries) in by_dim {
            self.store.save(d, entries)?;
        }
        self.current
            .retain(|&(_, pattern), _| group.pattern_dim(pattern) >= dim);
        Ok(())
    }

    /// Drops everything, in memory and in the store.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn destroy(&mut self) -> Result<(), BuchbergerError> {
        self.current.clear();
        self.pending.clear();
        self.store.destroy()?;
        Ok(())
    }

    /// The node vector of `(block, pattern)`: its divisor times the
    /// quotient. Computed from the nearest resident ancestor (or the
    /// divisor itself) and memoized along the way.
    ///
    /// # Errors
    ///
    /// Fails if the node is uncovered or its ancestors disagree on the
    /// divisor.
    pub fn node_vector(
        &mut self,
        group: &Group,
        trie: &PatternTrie,
        reduced: &ReducedList,
        block: usize,
        pattern: usize,
        blocks: usize,
    ) -> Result<&[u32], BuchbergerError> {
        let key = (block, pattern);
        if !self.current.contains_key(&key) {
            let rv = trie.node(block, pattern).divisor.ok_or_else(|| {
                BuchbergerError::Inconsistent(format!(
                    "node vector of uncovered (block {block}, pattern {pattern})"
                ))
            })?;
            let mut chain: SmallVec<[usize; 8]> = SmallVec::new();
            let mut at = pattern;
            let mut v = loop {
                if let Some(v) = self.current.get(&(block, at)) {
                    break v.clone();
                }
                let node = trie.node(block, at);
                if node.divisor != Some(rv) {
                    return Err(BuchbergerError::Inconsistent(format!(
                        "pattern {at} of block {block} has another divisor"
                    )));
                }
                if node.qi == ROOT {
                    let w = reduced.get(rv).w.clone();
                    self.current.insert((block, at), w.clone());
                    break w;
                }
                chain.push(at);
                at = group.paths().node(at).parent.ok_or_else(|| {
                    BuchbergerError::Inconsistent(format!("pattern {at} has no parent"))
                })?;
            };
            let mut out = vec![0u32; v.len()];
            for &m in chain.iter().rev() {
                let arrow = group.paths().node(m).last_arrow.ok_or_else(|| {
                    BuchbergerError::Inconsistent(format!("pattern {m} has no last arrow"))
                })?;
                group.multiply_by_arrow(&v, usize::from(arrow), &mut out, blocks);
                std::mem::swap(&mut v, &mut out);
                self.current.insert((block, m), v.clone());
            }
        }
        self.current
            .get(&key)
            .map(Vec::as_slice)
            .ok_or_else(|| BuchbergerError::Inconsistent("node vector vanished".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pattern: usize) -> SliceEntry {
        SliceEntry {
            block: 1,
            pattern,
            w: vec![pattern as u32, 7],
        }
    }

    #[test]
    fn test_memory_slices_are_fifo_per_dim() {
        let mut store = MemorySlices::default();
        store.save(2, vec![entry(3)]).unwrap();
        store.save(2, vec![entry(4)]).unwrap();
        store.save(3, vec![entry(5)]).unwrap();
        assert_eq!(store.load(2).unwrap(), vec![entry(3), entry(4)]);
        assert!(store.load(2).unwrap().is_empty());
        store.destroy().unwrap();
        assert!(store.load(3).unwrap().is_empty());
    }

    #[test]
    fn test_directory_slices() {
        let dir = std::env::temp_dir().join(format!("modres-slices-{}", std::process::id()));
        let mut store = DirectorySlices::new(dir.clone());
        assert!(store.load(1).unwrap().is_empty());
        store.save(1, vec![entry(2), entry(3)]).unwrap();
        store.save(1, vec![entry(4)]).unwrap();
        assert!(dir.join("slice-1.bin").exists());
        assert_eq!(store.load(1).unwrap(), vec![entry(2), entry(3), entry(4)]);
        assert!(!dir.join("slice-1.bin").exists());
        store.save(5, vec![entry(9)]).unwrap();
        store.destroy().unwrap();
        assert!(!dir.exists());
        store.destroy().unwrap();
    }

    #[test]
    fn test_slice_with_oversized_length_is_corrupt() {
        let dir = std::env::temp_dir().join(format!("modres-bad-slice-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut bytes = Vec::new();
        for x in [0u64, 1, u64::MAX / 2] {
            bytes.extend_from_slice(&x.to_le_bytes());
        }
        bytes.extend_from_slice(&5u32.to_le_bytes());
        fs::write(dir.join("slice-2.bin"), &bytes).unwrap();
        let mut store = DirectorySlices::new(dir.clone());
        let err = store.load(2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        store.destroy().unwrap();
    }
}
