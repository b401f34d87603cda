//! # modres-resolution
//!
//! Minimal projective resolutions of the trivial module over `F_p G`.
//!
//! `d_1` sends the free generators of `P_1` to minimal generators of the
//! radical. Every further `d_{k+1}` comes from an RGS on `d_k`: its kernel
//! basis is reduced to minimal generators, and the image side is kept as
//! an [`UrbildGb`] for computing preimages under `d_k`.
//!
//! The image dimension of each `d_k` is known in advance from exactness,
//! which lets the RGS stop as soon as the kernel reaches its dimension.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod differential;
pub mod error;
pub mod resolution;
pub mod store;
pub mod urbild;

mod proptests;

pub use differential::Differential;
pub use error::ResolutionError;
pub use resolution::{Resolution, ResolutionConfig};
pub use store::ResolutionStore;
pub use urbild::UrbildGb;
