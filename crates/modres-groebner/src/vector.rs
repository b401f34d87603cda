//! General vectors and their pool.

use crate::error::BuchbergerError;

/// A scratch vector of the free module of rank `r + s`, with the
/// metadata of its leading term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneralVector {
    /// Coordinates, `r + s` blocks of `nontips` residues.
    pub w: Vec<u32>,
    /// Leading coefficient (one once monic).
    pub coeff: u32,
    /// Block of the leading term.
    pub block: usize,
    /// Pattern of the leading term.
    pub pattern: usize,
    /// Length of the leading pattern.
    pub dim: usize,
    /// True for products of reduced vectors with arrows, false for
    /// vectors fed from outside.
    pub radical: bool,
}

/// Allocates general vectors of one width and recycles returned ones.
#[derive(Debug)]
pub struct VectorPool {
    width: usize,
    free: Vec<Vec<u32>>,
    live: usize,
    limit: usize,
}

impl VectorPool {
    /// Creates a pool of vectors with `width` entries, at most `limit`
    /// of them live at once.
    #[must_use]
    pub fn new(width: usize, limit: usize) -> Self {
        Self {
            width,
            free: Vec::new(),
            live: 0,
            limit,
        }
    }

    /// Vector width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Vectors handed out and not yet returned.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Hands out a zeroed vector.
    ///
    /// # Errors
    ///
    /// [`BuchbergerError::PoolExhausted`] once `limit` vectors are live.
    pub fn pop(&mut self) -> Result<GeneralVector, BuchbergerError> {
        if self.live >= self.limit {
            return Err(BuchbergerError::PoolExhausted { limit: self.limit });
        }
        self.live += 1;
        let w = match self.free.pop() {
            Some(mut w) => {
                w.fill(0);
                w
            }
            None => vec![0; self.width],
        };
        Ok(GeneralVector {
            w,
            coeff: 0,
            block: 0,
            pattern: 0,
            dim: 0,
            radical: false,
        })
    }

    /// Takes a vector back for reuse.
    pub fn recycle(&mut self, gv: GeneralVector) {
        self.live = self.live.saturating_sub(1);
        self.free.push(gv.w);
    }

    /// Releases a vector whose storage moves into a reduced vector.
    pub fn retire(&mut self, gv: GeneralVector) -> Vec<u32> {
        self.live = self.live.saturating_sub(1);
        gv.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recycled_vectors_are_zeroed() {
        let mut pool = VectorPool::new(3, 4);
        let mut gv = pool.pop().unwrap();
        gv.w[1] = 7;
        pool.recycle(gv);
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.pop().unwrap().w, vec![0, 0, 0]);
    }

    #[test]
    fn test_limit() {
        let mut pool = VectorPool::new(2, 2);
        let a = pool.pop().unwrap();
        let _b = pool.pop().unwrap();
        let err = pool.pop().unwrap_err();
        assert_eq!(err.kind(), modres_algebra::ErrorKind::ResourceExhausted);
        let w = pool.retire(a);
        assert_eq!(w.len(), 2);
        assert!(pool.pop().is_ok());
    }
}
