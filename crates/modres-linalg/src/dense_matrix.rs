//! Dense matrix implementation over F_p.
//!
//! Action matrices of basic algebras and differentials of resolutions are
//! small enough that a flat row-major buffer is the right representation.

use std::ops::{Index, IndexMut};

use modres_field::{PrimeField, FF_ONE};
use rayon::prelude::*;

use crate::echelon::Echelon;
use crate::row_ops::add_scaled;

/// Rows at or above this count are multiplied in parallel.
const PARALLEL_ROWS: usize = 64;

/// Dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DenseMatrix {
    /// Matrix entries in row-major order.
    data: Vec<u32>,
    /// Number of rows.
    num_rows: usize,
    /// Number of columns.
    num_cols: usize,
}

impl DenseMatrix {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![0; num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from a list of equally long rows.
    ///
    /// `num_cols` is needed to describe a matrix without rows.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have `num_cols` entries.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<u32>>, num_cols: usize) -> Self {
        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * num_cols);
        for row in rows {
            assert_eq!(row.len(), num_cols, "ragged matrix rows");
            data.extend(row);
        }
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Wraps a row-major buffer.
    ///
    /// Returns `None` if the buffer length does not match the shape.
    #[must_use]
    pub fn from_data(data: Vec<u32>, num_rows: usize, num_cols: usize) -> Option<Self> {
        (data.len() == num_rows * num_cols).then_some(Self {
            data,
            num_rows,
            num_cols,
        })
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = FF_ONE;
        }
        m
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Checks if the matrix is square.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.num_rows == self.num_cols
    }

    /// Returns the raw row-major entries.
    #[must_use]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Returns a mutable slice of the specified row.
    pub fn row_mut(&mut self, row: usize) -> &mut [u32] {
        let start = row * self.num_cols;
        &mut self.data[start..start + self.num_cols]
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.data.chunks(self.num_cols.max(1)).take(self.num_rows)
    }

    /// Appends a row.
    ///
    /// # Panics
    ///
    /// Panics if the row length differs from the column count.
    pub fn push_row(&mut self, row: &[u32]) {
        assert_eq!(row.len(), self.num_cols, "row length mismatch");
        self.data.extend_from_slice(row);
        self.num_rows += 1;
    }

    /// Index of the first nonzero entry of a row, if any.
    #[must_use]
    pub fn row_support_start(&self, row: usize) -> Option<usize> {
        self.row(row).iter().position(|&x| x != 0)
    }

    /// Matrix-matrix multiply: C = A * B.
    ///
    /// # Panics
    ///
    /// Panics if the inner dimensions disagree.
    #[must_use]
    pub fn mm(&self, other: &Self, field: &PrimeField) -> Self {
        assert_eq!(self.num_cols, other.num_rows);

        let mut result = Self::zeros(self.num_rows, other.num_cols);
        if other.num_cols == 0 {
            return result;
        }
        let multiply_row = |(i, out): (usize, &mut [u32])| {
            for (k, &a) in self.row(i).iter().enumerate() {
                if a != 0 {
                    add_scaled(field, out, other.row(k), a);
                }
            }
        };

        if self.num_rows >= PARALLEL_ROWS {
            result
                .data
                .par_chunks_mut(other.num_cols)
                .enumerate()
                .for_each(multiply_row);
        } else {
            result
                .data
                .chunks_mut(other.num_cols)
                .enumerate()
                .for_each(multiply_row);
        }
        result
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.num_cols, self.num_rows);
        for i in 0..self.num_rows {
            for j in 0..self.num_cols {
                result[(j, i)] = self[(i, j)];
            }
        }
        result
    }

    /// Rank over F_p.
    #[must_use]
    pub fn rank(&self, field: &PrimeField) -> usize {
        let mut echelon = Echelon::new(self.num_cols);
        for row in self.rows() {
            echelon.insert(field, row.to_vec());
        }
        echelon.rank()
    }

    /// Computes the inverse (for square matrices).
    ///
    /// Returns `None` if the matrix is singular.
    #[must_use]
    pub fn inverse(&self, field: &PrimeField) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        let n = self.num_rows;
        let mut echelon = Echelon::with_tracking(n, n);
        for row in self.rows() {
            if !echelon.insert(field, row.to_vec()) {
                return None;
            }
        }

        // Row j of the inverse expresses e_j in terms of the rows of self.
        let mut inv = Self::zeros(n, n);
        let mut unit = vec![0u32; n];
        for j in 0..n {
            unit[j] = FF_ONE;
            let coeffs = echelon.solve(field, &unit)?;
            inv.row_mut(j).copy_from_slice(&coeffs);
            unit[j] = 0;
        }
        Some(inv)
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = u32;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.num_cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.num_cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(p: u64) -> PrimeField {
        PrimeField::new(p).unwrap()
    }

    #[test]
    fn test_zeros() {
        let m = DenseMatrix::zeros(3, 4);
        assert_eq!(m.num_rows(), 3);
        assert_eq!(m.num_cols(), 4);
        assert!(m.data().iter().all(|&x| x == 0));
    }

    #[test]
    fn test_identity() {
        let id = DenseMatrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id[(i, j)], u32::from(i == j));
            }
        }
    }

    #[test]
    fn test_mm() {
        let f = gf(7);
        let a = DenseMatrix::from_rows(vec![vec![1, 2], vec![3, 4]], 2);
        let b = DenseMatrix::from_rows(vec![vec![5, 6], vec![0, 1]], 2);
        let c = a.mm(&b, &f);
        // [[5, 8], [15, 22]] mod 7
        assert_eq!(c.row(0), &[5, 1]);
        assert_eq!(c.row(1), &[1, 1]);
    }

    #[test]
    fn test_transpose() {
        let m = DenseMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]], 3);
        let t = m.transpose();
        assert_eq!(t.num_rows(), 3);
        assert_eq!(t[(1, 0)], 2);
        assert_eq!(t[(2, 1)], 6);
    }

    #[test]
    fn test_inverse() {
        let f = gf(5);
        let m = DenseMatrix::from_rows(vec![vec![2, 1], vec![1, 1]], 2);
        let inv = m.inverse(&f).unwrap();
        assert_eq!(m.mm(&inv, &f), DenseMatrix::identity(2));
        assert_eq!(inv.mm(&m, &f), DenseMatrix::identity(2));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let f = gf(3);
        let m = DenseMatrix::from_rows(vec![vec![1, 2], vec![2, 1]], 2);
        // second row is twice the first mod 3
        assert!(m.inverse(&f).is_none());
        assert_eq!(m.rank(&f), 1);
    }

    #[test]
    fn test_push_row() {
        let mut m = DenseMatrix::zeros(0, 2);
        m.push_row(&[1, 0]);
        m.push_row(&[0, 3]);
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.row_support_start(1), Some(1));
        assert_eq!(m.rows().count(), 2);
    }
}
