//! Differentials `d_n: P_n -> P_{n-1}` of a resolution.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use modres_algebra::Group;
use modres_linalg::{add_scaled, read_matrix, write_matrix, DenseMatrix};

use crate::error::ResolutionError;

/// The differential `d_n` of a resolution by free modules.
///
/// Row `i` of the matrix is the image of the `i`-th free generator of
/// `P_n`, a vector with `target_rank` blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Differential {
    degree: usize,
    target_rank: usize,
    matrix: DenseMatrix,
}

impl Differential {
    /// Builds `d_degree` from the images of the generators of `P_degree`.
    ///
    /// # Panics
    ///
    /// Panics if an image does not have `target_rank * nontips` entries.
    #[must_use]
    pub fn new(degree: usize, target_rank: usize, nontips: usize, images: Vec<Vec<u32>>) -> Self {
        Self {
            degree,
            target_rank,
            matrix: DenseMatrix::from_rows(images, target_rank * nontips),
        }
    }

    /// The `n` of `d_n`.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Rank of `P_n`.
    #[must_use]
    pub fn source_rank(&self) -> usize {
        self.matrix.num_rows()
    }

    /// Rank of `P_{n-1}`.
    #[must_use]
    pub fn target_rank(&self) -> usize {
        self.target_rank
    }

    /// The images of the generators, one per row.
    #[must_use]
    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    /// Evaluates `d_n` on an element of `P_n`.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::WidthMismatch`] if `x` does not live in `P_n`.
    pub fn apply(&self, group: &Group, x: &[u32]) -> Result<Vec<u32>, ResolutionError> {
        let n = group.nontips();
        if x.len() != self.source_rank() * n {
            return Err(ResolutionError::WidthMismatch {
                expected: self.source_rank() * n,
                found: x.len(),
            });
        }
        let field = group.field();
        let mut out = vec![0u32; self.target_rank * n];
        for (i, coords) in x.chunks(n).enumerate() {
            let row = self.matrix.row(i);
            for (m, &c) in coords.iter().enumerate() {
                if c != 0 {
                    let product = group.multiply_by_pattern(row, m, self.target_rank);
                    add_scaled(field, &mut out, &product, c);
                }
            }
        }
        Ok(out)
    }

    /// Writes the matrix in the binary matrix format.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors.
    pub fn save(&self, path: &Path, p: u32) -> Result<(), ResolutionError> {
        let file = File::create(path)?;
        write_matrix(BufWriter::new(file), p, &self.matrix)?;
        Ok(())
    }

    /// Reads `d_degree` back.
    ///
    /// # Errors
    ///
    /// I/O errors, a characteristic other than the group's, or a row
    /// length that is not a multiple of the group's dimension.
    pub fn load(path: &Path, group: &Group, degree: usize) -> Result<Self, ResolutionError> {
        let file = File::open(path)?;
        let (p, matrix) = read_matrix(BufReader::new(file))?;
        if p != group.p() {
            return Err(ResolutionError::WrongCharacteristic {
                expected: group.p(),
                found: p,
            });
        }
        let n = group.nontips();
        if matrix.num_cols() % n != 0 {
            return Err(ResolutionError::WidthMismatch {
                expected: n,
                found: matrix.num_cols(),
            });
        }
        Ok(Self {
            degree,
            target_rank: matrix.num_cols() / n,
            matrix,
        })
    }
}
