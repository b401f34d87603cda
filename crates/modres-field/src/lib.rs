//! # modres-field
//!
//! Arithmetic in the prime field F_p for a prime chosen at runtime.
//!
//! The characteristic of a group algebra is only known once a `.nontips`
//! header has been read, so the modulus lives in a [`PrimeField`] context
//! value rather than in the type. Field elements are plain `u32` residues
//! in `0..p`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod prime_field;

#[cfg(test)]
mod proptests;

pub use prime_field::{is_prime, valuation, FieldError, PrimeField, FF_ONE, FF_ZERO, MAX_PRIME};
