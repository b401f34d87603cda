//! # modres
//!
//! Minimal projective resolutions of the trivial module over the group
//! algebra `F_p G` of a finite p-group, by noncommutative Gröbner bases.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modres::prelude::*;
//!
//! let q8 = small_groups::quaternion_8().builder().build()?;
//! let mut res = Resolution::new(&q8, ResolutionConfig::default());
//! res.extend_to(4)?;
//! assert_eq!(res.ranks(), vec![1, 2, 2, 1, 1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use modres_algebra as algebra;
pub use modres_field as field;
pub use modres_groebner as groebner;
pub use modres_linalg as linalg;
pub use modres_resolution as resolution;

pub mod cli;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use modres_algebra::{small_groups, AlgebraBuilder, ErrorKind, Group, PathOrdering};
    pub use modres_field::PrimeField;
    pub use modres_groebner::{BuchbergerConfig, Fgs, Rgs};
    pub use modres_linalg::DenseMatrix;
    pub use modres_resolution::{Resolution, ResolutionConfig, ResolutionStore};
}
