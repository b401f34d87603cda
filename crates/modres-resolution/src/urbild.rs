//! Preimages under a differential, from the image side of its RGS.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use modres_groebner::Ngs;
use modres_linalg::{is_zero, write_matrix, DenseMatrix};

use crate::error::ResolutionError;

/// A Gröbner basis of `Im d_n` whose vectors carry their preimages.
///
/// Every vector is `(y | x)` with `d_n(x) = y`. Reducing `(y | 0)` to
/// `(0 | -x)` therefore exhibits a preimage `x` of `y`.
#[derive(Debug)]
pub struct UrbildGb<'g> {
    degree: usize,
    ngs: Ngs<'g>,
}

impl<'g> UrbildGb<'g> {
    /// Wraps the finished image set of the RGS of `d_degree`. The set is
    /// complete, so any further Buchberger on it is refused.
    #[must_use]
    pub fn new(degree: usize, mut ngs: Ngs<'g>) -> Self {
        ngs.mark_no_buchberger_required();
        Self { degree, ngs }
    }

    /// The `n` of `d_n`.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of basis vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ngs.reduced().len()
    }

    /// True for the basis of the zero map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ngs.reduced().is_empty()
    }

    /// The underlying Gröbner set.
    #[must_use]
    pub fn ngs(&self) -> &Ngs<'g> {
        &self.ngs
    }

    /// A preimage of `y` under `d_n`.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::NotInImage`] if `y` is not in the image;
    /// [`ResolutionError::WidthMismatch`] if it is not in `P_{n-1}`.
    pub fn preimage(&mut self, y: &[u32]) -> Result<Vec<u32>, ResolutionError> {
        let split = self.ngs.r() * self.ngs.group().nontips();
        if y.len() != split {
            return Err(ResolutionError::WidthMismatch {
                expected: split,
                found: y.len(),
            });
        }
        let mut w = vec![0u32; self.ngs.width()];
        w[..split].copy_from_slice(y);
        let w = self.ngs.reduce(w)?;
        if !is_zero(&w[..split]) {
            return Err(ResolutionError::NotInImage {
                degree: self.degree,
            });
        }
        let field = self.ngs.group().field();
        Ok(w[split..].iter().map(|&c| field.neg(c)).collect())
    }

    /// Preimages of a batch of images, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first vector [`UrbildGb::preimage`] rejects.
    pub fn inner_preimages(&mut self, images: &[Vec<u32>]) -> Result<Vec<Vec<u32>>, ResolutionError> {
        images.iter().map(|y| self.preimage(y)).collect()
    }

    /// Writes the basis, one vector per row, in the binary matrix format.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors.
    pub fn save(&self, path: &Path) -> Result<(), ResolutionError> {
        let rows: Vec<Vec<u32>> = self.ngs.reduced().iter().map(|rv| rv.w.clone()).collect();
        let matrix = DenseMatrix::from_rows(rows, self.ngs.width());
        let file = File::create(path)?;
        write_matrix(BufWriter::new(file), self.ngs.group().p(), &matrix)?;
        Ok(())
    }
}
