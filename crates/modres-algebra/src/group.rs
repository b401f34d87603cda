//! The basic algebra context shared by every Buchberger run.

use std::ops::Range;

use modres_field::{valuation, PrimeField, FF_ONE};
use modres_linalg::{multiply_blocks, DenseMatrix};

use crate::error::GroupError;
use crate::ordering::PathOrdering;
use crate::path::{PathTree, Word};

/// A basic algebra: nontip monomials, their tree and the right action of
/// the arrows.
///
/// Immutable once built; the image side and the kernel side of a
/// resolution step borrow the same `Group`.
#[derive(Clone, Debug)]
pub struct Group {
    field: PrimeField,
    ordering: PathOrdering,
    arrow_dims: Vec<u32>,
    paths: PathTree,
    /// `ds[d]` is the first pattern of length `d`; `ds[maxlength + 1] == nontips`.
    ds: Vec<usize>,
    maxlength: usize,
    mintips: usize,
    action: Vec<DenseMatrix>,
}

impl Group {
    /// Assembles and validates a basic algebra.
    ///
    /// `words` lists the nontips in pattern order, `action[a]` is the
    /// matrix of right multiplication by arrow `a` in the nontip basis and
    /// `arrow_dims` holds the Jennings dimensions (ignored unless the
    /// ordering is weighted; empty means all ones).
    ///
    /// # Errors
    ///
    /// Returns an `InputMalformed` error naming the first inconsistency.
    pub fn new(
        p: u32,
        ordering: PathOrdering,
        arrow_dims: Vec<u32>,
        words: Vec<Word>,
        action: Vec<DenseMatrix>,
        mintips: usize,
    ) -> Result<Self, GroupError> {
        let field = PrimeField::new(u64::from(p))?;
        let arrows = action.len();
        let nontips = words.len();

        if valuation(u64::from(p), nontips as u64).is_none() {
            return Err(GroupError::malformed("nontips", nontips));
        }
        let arrow_dims = if ordering.is_weighted() && !arrow_dims.is_empty() {
            if arrow_dims.len() != arrows {
                return Err(GroupError::malformed("number of Jennings dimensions", arrow_dims.len()));
            }
            if let Some(&bad) = arrow_dims.iter().find(|&&d| d == 0) {
                return Err(GroupError::malformed("Jennings dimension", bad));
            }
            arrow_dims
        } else {
            vec![1; arrows]
        };

        for pair in words.windows(2) {
            if ordering.compare(&pair[0], &pair[1], &arrow_dims) != std::cmp::Ordering::Less {
                return Err(GroupError::Inconsistent(format!(
                    "patterns {:?} and {:?} are out of order",
                    pair[0].as_slice(),
                    pair[1].as_slice()
                )));
            }
        }
        let dims: Vec<usize> = words.iter().map(|w| ordering.weight(w, &arrow_dims)).collect();
        let maxlength = dims.last().copied().unwrap_or(0);
        let ds = (0..=maxlength + 1)
            .map(|d| dims.partition_point(|&x| x < d))
            .collect();
        let paths = PathTree::new(words, arrows, &dims)?;

        for m in &action {
            if m.num_rows() != nontips || m.num_cols() != nontips {
                return Err(GroupError::malformed("action matrix size", m.num_rows()));
            }
            if let Some(&bad) = m.data().iter().find(|&&x| x >= p) {
                return Err(GroupError::malformed("action entry", bad));
            }
        }

        let group = Self {
            field,
            ordering,
            arrow_dims,
            paths,
            ds,
            maxlength,
            mintips,
            action,
        };
        group.validate()?;
        Ok(group)
    }

    /// Checks that the action matrices are compatible with the tree and
    /// with the ordering.
    ///
    /// For every arrow `a`: the row of a pattern whose extension is a
    /// nontip is that unit vector; every product lies in lengths at least
    /// `dim(n) + dim(a)`; and the support of a later row starts strictly
    /// beyond the extension of every earlier pattern. The last condition
    /// makes leading terms multiplicative.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::Inconsistent`] describing the first failure.
    pub fn validate(&self) -> Result<(), GroupError> {
        for (a, matrix) in self.action.iter().enumerate() {
            let weight = self.arrow_dims[a] as usize;
            let mut last_child: Option<usize> = None;
            for n in 0..self.nontips() {
                let row = matrix.row(n);
                let start = matrix.row_support_start(n);
                if let (Some(c), Some(s)) = (last_child, start) {
                    if s <= c {
                        return Err(GroupError::Inconsistent(format!(
                            "arrow {a} is not admissible at pattern {n}"
                        )));
                    }
                }
                let floor = self.pattern_dim(n) + weight;
                if let Some(j) = row.iter().enumerate().position(|(j, &x)| x != 0 && self.pattern_dim(j) < floor) {
                    return Err(GroupError::Inconsistent(format!(
                        "arrow {a} lowers the length of pattern {n} onto pattern {j}"
                    )));
                }
                if let Some(c) = self.paths.child(n, a) {
                    let is_unit = start == Some(c)
                        && row[c] == FF_ONE
                        && row.iter().filter(|&&x| x != 0).count() == 1;
                    if !is_unit {
                        return Err(GroupError::Inconsistent(format!(
                            "row {n} of arrow {a} is not the unit vector of pattern {c}"
                        )));
                    }
                    last_child = Some(c);
                }
            }
        }
        Ok(())
    }

    /// The coefficient field.
    #[must_use]
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// The characteristic.
    #[must_use]
    pub fn p(&self) -> u32 {
        self.field.characteristic()
    }

    /// Dimension of the algebra.
    #[must_use]
    pub fn nontips(&self) -> usize {
        self.paths.len()
    }

    /// `v` with `nontips == p^v`.
    #[must_use]
    pub fn order_exponent(&self) -> u32 {
        valuation(u64::from(self.p()), self.nontips() as u64).unwrap_or(0)
    }

    /// Number of arrows (generators).
    #[must_use]
    pub fn arrows(&self) -> usize {
        self.action.len()
    }

    /// Size of the reduced Gröbner basis of the algebra.
    #[must_use]
    pub fn mintips(&self) -> usize {
        self.mintips
    }

    /// Length of the longest nontip.
    #[must_use]
    pub fn maxlength(&self) -> usize {
        self.maxlength
    }

    /// The ordering.
    #[must_use]
    pub fn ordering(&self) -> PathOrdering {
        self.ordering
    }

    /// Arrow weights (all ones unless Jennings).
    #[must_use]
    pub fn arrow_dims(&self) -> &[u32] {
        &self.arrow_dims
    }

    /// The path tree.
    #[must_use]
    pub fn paths(&self) -> &PathTree {
        &self.paths
    }

    /// Right multiplication by an arrow.
    #[must_use]
    pub fn action(&self, arrow: usize) -> &DenseMatrix {
        &self.action[arrow]
    }

    /// The `dS` table.
    #[must_use]
    pub fn ds(&self) -> &[usize] {
        &self.ds
    }

    /// Patterns of length `d`; empty past `maxlength`.
    #[must_use]
    pub fn patterns_of_dim(&self, d: usize) -> Range<usize> {
        if d > self.maxlength {
            let n = self.nontips();
            return n..n;
        }
        self.ds[d]..self.ds[d + 1]
    }

    /// Length of a pattern.
    #[must_use]
    pub fn pattern_dim(&self, pattern: usize) -> usize {
        self.paths.node(pattern).dim
    }

    /// Pattern of the arrow itself, if it is a nontip.
    #[must_use]
    pub fn arrow_pattern(&self, arrow: usize) -> Option<usize> {
        self.paths.child(0, arrow)
    }

    /// `out = w · a` on the first `blocks` blocks.
    pub fn multiply_by_arrow(&self, w: &[u32], arrow: usize, out: &mut [u32], blocks: usize) {
        multiply_blocks(&self.field, w, &self.action[arrow], out, blocks);
    }

    /// `w · m` for a nontip `m`, on the first `blocks` blocks.
    #[must_use]
    pub fn multiply_by_pattern(&self, w: &[u32], pattern: usize, blocks: usize) -> Vec<u32> {
        let mut cur = w.to_vec();
        let mut tmp = vec![0u32; w.len()];
        for &a in &self.paths.node(pattern).word {
            self.multiply_by_arrow(&cur, usize::from(a), &mut tmp, blocks);
            std::mem::swap(&mut cur, &mut tmp);
        }
        cur
    }

    /// The free-module basis element of `block` at `pattern`.
    #[must_use]
    pub fn unit_vector(&self, block: usize, pattern: usize, blocks: usize) -> Vec<u32> {
        let mut v = vec![0u32; blocks * self.nontips()];
        v[block * self.nontips() + pattern] = FF_ONE;
        v
    }
}
