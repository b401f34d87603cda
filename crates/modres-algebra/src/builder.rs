//! Construction of the basic algebra of `F_p G` for a finite p-group `G`.
//!
//! The group is given by permutation generators `g_i`; the arrows are the
//! elements `g_i - 1` of the augmentation ideal. Every word in the arrows
//! is evaluated in the regular representation. Walking the nonzero words
//! from the largest down, a word is a nontip exactly when its image is
//! independent of the images of all larger words. The nontips then form a
//! basis of `F_p G` whose leading terms behave under right multiplication.

use std::collections::VecDeque;

use modres_field::{valuation, PrimeField, FF_ONE};
use modres_linalg::{DenseMatrix, Echelon};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::GroupError;
use crate::group::Group;
use crate::ordering::PathOrdering;
use crate::path::Word;

/// Default cap on the number of nonzero words.
pub const DEFAULT_WORD_LIMIT: usize = 1 << 20;

/// Builds a [`Group`] from permutation generators.
#[derive(Clone, Debug)]
pub struct AlgebraBuilder {
    p: u32,
    generators: Vec<Vec<usize>>,
    ordering: PathOrdering,
    arrow_dims: Vec<u32>,
    word_limit: usize,
}

impl AlgebraBuilder {
    /// Starts a builder for the group generated by `generators` over F_p.
    #[must_use]
    pub fn new(p: u32, generators: Vec<Vec<usize>>) -> Self {
        Self {
            p,
            generators,
            ordering: PathOrdering::default(),
            arrow_dims: Vec::new(),
            word_limit: DEFAULT_WORD_LIMIT,
        }
    }

    /// Sets the path ordering.
    #[must_use]
    pub fn with_ordering(mut self, ordering: PathOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the Jennings dimensions of the arrows.
    #[must_use]
    pub fn with_dims(mut self, dims: Vec<u32>) -> Self {
        self.arrow_dims = dims;
        self
    }

    /// Caps the number of group elements and nonzero words.
    #[must_use]
    pub fn with_word_limit(mut self, limit: usize) -> Self {
        self.word_limit = limit;
        self
    }

    /// Computes the basic algebra.
    ///
    /// # Errors
    ///
    /// `InputMalformed` if a generator is not a permutation, the group
    /// order is not a power of `p` or the dimensions do not fit;
    /// `ResourceExhausted` if the word limit is hit.
    pub fn build(&self) -> Result<Group, GroupError> {
        let field = PrimeField::new(u64::from(self.p))?;
        let arrows = self.generators.len();
        if arrows > usize::from(u8::MAX) {
            return Err(GroupError::malformed("arrows", arrows));
        }
        let mult = self.right_multiplication()?;
        let order = mult.len();
        if valuation(u64::from(self.p), order as u64).is_none() {
            return Err(GroupError::malformed("group order", order));
        }

        let dims = if self.ordering.is_weighted() && !self.arrow_dims.is_empty() {
            self.arrow_dims.clone()
        } else {
            vec![1; arrows]
        };
        if dims.len() != arrows {
            return Err(GroupError::malformed("number of Jennings dimensions", dims.len()));
        }

        let mut words = self.nonzero_words(&field, &mult)?;
        words.sort_by(|a, b| self.ordering.compare(&a.0, &b.0, &dims));

        let mut span = Echelon::new(order);
        let mut is_nontip = vec![false; words.len()];
        for (i, (_, image)) in words.iter().enumerate().rev() {
            is_nontip[i] = span.insert(&field, image.clone());
        }
        let (nontips, images): (Vec<Word>, Vec<Vec<u32>>) = words
            .into_iter()
            .zip(is_nontip)
            .filter_map(|(w, keep)| keep.then_some(w))
            .unzip();
        if nontips.len() != order {
            return Err(GroupError::Inconsistent(format!(
                "{} nontips for a group of order {order}",
                nontips.len()
            )));
        }

        let mut basis = Echelon::with_tracking(order, order);
        for image in &images {
            basis.insert(&field, image.clone());
        }
        let action = (0..arrows)
            .map(|a| {
                let rows = images
                    .par_iter()
                    .map(|image| basis.solve(&field, &times_arrow(&field, image, &mult, a)))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| GroupError::Inconsistent(format!("arrow {a} leaves the algebra")))?;
                Ok(DenseMatrix::from_rows(rows, order))
            })
            .collect::<Result<Vec<_>, GroupError>>()?;

        let mintips = count_mintips(&nontips, arrows);
        debug!(
            p = self.p,
            order,
            arrows,
            mintips,
            ordering = %self.ordering,
            "built basic algebra"
        );
        let dims = if self.ordering.is_weighted() { dims } else { Vec::new() };
        Group::new(self.p, self.ordering, dims, nontips, action, mintips)
    }

    /// Enumerates the group and tabulates `mult[h][a] = h * g_a`.
    fn right_multiplication(&self) -> Result<Vec<SmallVec<[usize; 4]>>, GroupError> {
        let degree = self.generators.first().map_or(1, Vec::len);
        for (i, g) in self.generators.iter().enumerate() {
            let mut seen = vec![false; degree];
            let ok = g.len() == degree
                && g.iter().all(|&x| x < degree && !std::mem::replace(&mut seen[x], true));
            if !ok {
                return Err(GroupError::malformed("generator", i));
            }
        }

        let identity: Vec<usize> = (0..degree).collect();
        let mut index: FxHashMap<Vec<usize>, usize> = FxHashMap::default();
        let mut elements = vec![identity.clone()];
        index.insert(identity, 0);
        let mut mult = Vec::new();
        let mut h = 0;
        while h < elements.len() {
            let mut row = SmallVec::new();
            for g in &self.generators {
                // apply h, then g
                let product: Vec<usize> = elements[h].iter().map(|&x| g[x]).collect();
                let next = elements.len();
                let id = *index.entry(product.clone()).or_insert(next);
                if id == next {
                    if next >= self.word_limit {
                        return Err(GroupError::TooManyWords(self.word_limit));
                    }
                    elements.push(product);
                }
                row.push(id);
            }
            mult.push(row);
            h += 1;
        }
        Ok(mult)
    }

    /// All words with a nonzero image, breadth first.
    fn nonzero_words(
        &self,
        field: &PrimeField,
        mult: &[SmallVec<[usize; 4]>],
    ) -> Result<Vec<(Word, Vec<u32>)>, GroupError> {
        let mut one = vec![0u32; mult.len()];
        one[0] = FF_ONE;
        let mut words = vec![(Word::new(), one)];
        let mut queue = VecDeque::from([0usize]);
        while let Some(i) = queue.pop_front() {
            for a in 0..self.generators.len() {
                let image = times_arrow(field, &words[i].1, mult, a);
                if image.iter().all(|&x| x == 0) {
                    continue;
                }
                if words.len() >= self.word_limit {
                    return Err(GroupError::TooManyWords(self.word_limit));
                }
                let mut word = words[i].0.clone();
                #[allow(clippy::cast_possible_truncation)]
                word.push(a as u8);
                queue.push_back(words.len());
                words.push((word, image));
            }
        }
        Ok(words)
    }
}

/// `x * (g_a - 1)` in the regular representation.
fn times_arrow(field: &PrimeField, x: &[u32], mult: &[SmallVec<[usize; 4]>], a: usize) -> Vec<u32> {
    let mut y = vec![0u32; x.len()];
    for (h, &c) in x.iter().enumerate() {
        if c != 0 {
            let target = mult[h][a];
            y[target] = field.add(y[target], c);
            y[h] = field.sub(y[h], c);
        }
    }
    y
}

/// Counts the tips all of whose proper subwords are nontips.
///
/// Nontips are closed under subwords, so it suffices to look at words
/// `n · a` with `n` a nontip and to test the suffix without the first arrow.
fn count_mintips(nontips: &[Word], arrows: usize) -> usize {
    let set: FxHashSet<&[u8]> = nontips.iter().map(|w| w.as_slice()).collect();
    let mut count = 0;
    for n in nontips {
        for a in 0..arrows {
            let mut w: Word = n.clone();
            #[allow(clippy::cast_possible_truncation)]
            w.push(a as u8);
            if !set.contains(w.as_slice()) && set.contains(&w[1..]) {
                count += 1;
            }
        }
    }
    count
}
