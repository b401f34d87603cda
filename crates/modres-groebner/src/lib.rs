//! # modres-groebner
//!
//! Noncommutative Buchberger for submodules of free modules over a basic
//! algebra of `F_p G`.
//!
//! This crate provides:
//! - [`Ngs`]: a Gröbner set with its pattern tries, reduced vectors,
//!   unreduced heap and expansion slices
//! - [`Fgs`]: Buchberger for a finitely generated submodule, with
//!   minimal generators
//! - [`Rgs`]: Buchberger for the image of a map of free modules, which
//!   produces a Gröbner basis of the kernel along the way
//!
//! ## Leading terms
//!
//! Monomials of a free module are pairs `(block, pattern)`. They compare
//! pattern first, then block. Only blocks `0..r` of a vector count for
//! leading terms; blocks `r..r + s` record how the vector was produced.
//!
//! ## Expansion
//!
//! Instead of S-polynomials, every covered monomial is multiplied by
//! every arrow, one length at a time. Products that land on a monomial
//! covered by the same reduced vector are node vectors and are kept in
//! the expansion slice for the next length; everything else goes to
//! Aufnahme.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aufnahme;
pub mod config;
pub mod error;
pub mod expand;
pub mod fgs;
pub mod heap;
pub mod kernel;
pub mod ngs;
pub mod pattern;
pub mod reduced;
pub mod rgs;
pub mod slice;
pub mod vector;

mod proptests;

pub use config::{BuchbergerConfig, SliceBacking};
pub use error::BuchbergerError;
pub use fgs::Fgs;
pub use kernel::KernelSink;
pub use ngs::{ExpDim, Ngs};
pub use pattern::{NodeStatus, PatternNode, PatternTrie};
pub use reduced::{ReducedList, ReducedVector, RvId};
pub use rgs::Rgs;
pub use slice::{DirectorySlices, ExpansionSlice, MemorySlices, SliceEntry, SliceStore};
