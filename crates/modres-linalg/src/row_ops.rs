//! Row primitives on free-module vectors.
//!
//! These are the operations the Buchberger engine needs from its matrix
//! collaborator: axpy for reduction, scaling to make vectors monic,
//! right multiplication of every block by an action matrix, and the
//! search for a leading term.

use modres_field::PrimeField;

use crate::dense_matrix::DenseMatrix;

/// A leading term of a free-module vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeadingTerm {
    /// Pattern (monomial index inside a block).
    pub pattern: usize,
    /// Block (free generator).
    pub block: usize,
    /// The nonzero coefficient found there.
    pub coeff: u32,
}

/// `dst += c * src`.
///
/// # Panics
///
/// Panics if the slices differ in length.
#[inline]
pub fn add_scaled(field: &PrimeField, dst: &mut [u32], src: &[u32], c: u32) {
    assert_eq!(dst.len(), src.len(), "axpy length mismatch");
    if c == 0 {
        return;
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        if s != 0 {
            *d = field.add(*d, field.mul(c, s));
        }
    }
}

/// `row *= c`.
#[inline]
pub fn scale(field: &PrimeField, row: &mut [u32], c: u32) {
    if c == 1 {
        return;
    }
    for x in row.iter_mut() {
        *x = field.mul(*x, c);
    }
}

/// Returns true if every entry is zero.
#[inline]
#[must_use]
pub fn is_zero(row: &[u32]) -> bool {
    row.iter().all(|&x| x == 0)
}

/// Right-multiplies each of the first `nor` blocks of `w` by `matrix`,
/// writing the result into `out`.
///
/// Every block has `matrix.num_rows()` entries. `out` is overwritten.
///
/// # Panics
///
/// Panics if `matrix` is not square or the buffers are too short.
pub fn multiply_blocks(
    field: &PrimeField,
    w: &[u32],
    matrix: &DenseMatrix,
    out: &mut [u32],
    nor: usize,
) {
    assert!(matrix.is_square(), "action matrices are square");
    let n = matrix.num_rows();
    assert!(w.len() >= nor * n && out.len() >= nor * n, "buffer too short");

    out[..nor * n].fill(0);
    for b in 0..nor {
        let src = &w[b * n..(b + 1) * n];
        let dst = &mut out[b * n..(b + 1) * n];
        for (i, &c) in src.iter().enumerate() {
            if c != 0 {
                add_scaled(field, dst, matrix.row(i), c);
            }
        }
    }
}

/// Finds the leading term among the first `blocks` blocks of width `width`.
///
/// Terms are ordered pattern first, then block: the leading term is the
/// nonzero entry with the smallest pattern, ties broken by smallest block.
#[must_use]
pub fn leading_term(w: &[u32], blocks: usize, width: usize) -> Option<LeadingTerm> {
    leading_term_from(w, blocks, width, 0)
}

/// Like [`leading_term`], but only looks at patterns from `start` on.
///
/// Used during reduction, where everything before the previous leading
/// pattern is already known to vanish.
#[must_use]
pub fn leading_term_from(w: &[u32], blocks: usize, width: usize, start: usize) -> Option<LeadingTerm> {
    for pattern in start..width {
        for block in 0..blocks {
            let coeff = w[block * width + pattern];
            if coeff != 0 {
                return Some(LeadingTerm {
                    pattern,
                    block,
                    coeff,
                });
            }
        }
    }
    None
}
