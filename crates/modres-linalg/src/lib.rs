//! # modres-linalg
//!
//! Dense linear algebra over F_p, playing the part of the matrix
//! collaborator that the Buchberger engine is written against.
//!
//! This crate provides:
//! - Row-major dense matrices with `u32` residues
//! - Row primitives: axpy, scaling, block-wise right multiplication and
//!   leading-term search
//! - An incremental echelon form for rank, independence and solving
//! - A stable binary file format for matrices
//!
//! ## Free-module vectors
//!
//! A vector of the free module of rank `k` over an algebra of dimension
//! `n` is stored as `k` consecutive blocks of `n` residues. Block `b`,
//! pattern `m` lives at index `b * n + m`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dense_matrix;
pub mod echelon;
pub mod row_ops;
pub mod serialize;

pub use dense_matrix::DenseMatrix;
pub use echelon::Echelon;
pub use row_ops::{
    add_scaled, is_zero, leading_term, leading_term_from, multiply_blocks, scale, LeadingTerm,
};
pub use serialize::{read_matrix, write_matrix, MATRIX_MAGIC};

#[cfg(test)]
mod tests;
