//! The state of one noncommutative Gröbner basis computation.

use std::fmt;

use modres_algebra::Group;
use modres_linalg::{add_scaled, is_zero, leading_term, scale, LeadingTerm};
use tracing::trace;

use crate::config::BuchbergerConfig;
use crate::error::BuchbergerError;
use crate::heap::UnreducedHeap;
use crate::kernel::KernelSink;
use crate::pattern::PatternTrie;
use crate::reduced::{ReducedList, ReducedVector, RvId};
use crate::slice::ExpansionSlice;
use crate::vector::{GeneralVector, VectorPool};

/// The expansion frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpDim {
    /// No reduced vectors yet.
    NothingToExpand,
    /// The set is complete by construction; entering Buchberger is a bug.
    NoBuchbergerRequired,
    /// Every extension of length below this has been produced.
    Dim(usize),
}

impl fmt::Display for ExpDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpDim::NothingToExpand => f.write_str("nothing to expand"),
            ExpDim::NoBuchbergerRequired => f.write_str("no Buchberger required"),
            ExpDim::Dim(d) => write!(f, "{d}"),
        }
    }
}

/// A noncommutative Gröbner set.
///
/// Vectors live in the free module of rank `r + s`; leading terms are only
/// looked for in blocks `0..r`, the other `s` blocks carry bookkeeping.
#[derive(Debug)]
pub struct Ngs<'g> {
    pub(crate) group: &'g Group,
    pub(crate) r: usize,
    pub(crate) s: usize,
    pub(crate) pnontips: usize,
    pub(crate) prev_pnon: usize,
    pub(crate) unfruitful: usize,
    pub(crate) exp_dim: ExpDim,
    pub(crate) trie: PatternTrie,
    pub(crate) reduced: ReducedList,
    pub(crate) heap: UnreducedHeap,
    pub(crate) pool: VectorPool,
    pub(crate) target_rank: Option<usize>,
    pub(crate) slice: ExpansionSlice,
}

impl<'g> Ngs<'g> {
    /// Creates an empty Gröbner set; `label` names its slice store.
    #[must_use]
    pub fn new(group: &'g Group, r: usize, s: usize, config: &BuchbergerConfig, label: &str) -> Self {
        let n = group.nontips();
        let pnontips = r * n;
        Self {
            group,
            r,
            s,
            pnontips,
            prev_pnon: pnontips,
            unfruitful: 0,
            exp_dim: ExpDim::NothingToExpand,
            trie: PatternTrie::new(r, n, group.arrows()),
            reduced: ReducedList::new(),
            heap: UnreducedHeap::new(),
            pool: VectorPool::new((r + s) * n, config.vector_limit),
            target_rank: None,
            slice: ExpansionSlice::new(config.slices.open(label)),
        }
    }

    /// The algebra.
    #[must_use]
    pub fn group(&self) -> &'g Group {
        self.group
    }

    /// Rank of the output side.
    #[must_use]
    pub fn r(&self) -> usize {
        self.r
    }

    /// Rank of the bookkeeping side.
    #[must_use]
    pub fn s(&self) -> usize {
        self.s
    }

    /// Total number of blocks.
    #[must_use]
    pub fn nor(&self) -> usize {
        self.r + self.s
    }

    /// Vector width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.nor() * self.group.nontips()
    }

    /// Monomials of blocks `0..r` not covered by any leading term.
    #[must_use]
    pub fn pnontips(&self) -> usize {
        self.pnontips
    }

    /// Covered monomials, the dimension of the span found so far.
    #[must_use]
    pub fn covered(&self) -> usize {
        self.r * self.group.nontips() - self.pnontips
    }

    /// Consecutive expansion rounds without progress.
    #[must_use]
    pub fn unfruitful(&self) -> usize {
        self.unfruitful
    }

    /// The expansion frontier.
    #[must_use]
    pub fn exp_dim(&self) -> ExpDim {
        self.exp_dim
    }

    /// Expected dimension of the submodule, if known.
    #[must_use]
    pub fn target_rank(&self) -> Option<usize> {
        self.target_rank
    }

    /// Sets the expected dimension of the submodule.
    pub fn set_target_rank(&mut self, target: Option<usize>) {
        self.target_rank = target;
    }

    /// The reduced vectors.
    #[must_use]
    pub fn reduced(&self) -> &ReducedList {
        &self.reduced
    }

    /// The pattern tries.
    #[must_use]
    pub fn trie(&self) -> &PatternTrie {
        &self.trie
    }

    /// Vectors waiting for Aufnahme.
    #[must_use]
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// Live general vectors.
    #[must_use]
    pub fn live_vectors(&self) -> usize {
        self.pool.live()
    }

    /// Declares the set complete; any later Buchberger entry is an error.
    pub fn mark_no_buchberger_required(&mut self) {
        self.exp_dim = ExpDim::NoBuchbergerRequired;
    }

    /// Queues a vector fed from outside (a generator or kernel candidate).
    ///
    /// # Errors
    ///
    /// Fails on a width mismatch or an exhausted pool.
    pub fn push_generator(&mut self, w: &[u32]) -> Result<(), BuchbergerError> {
        if w.len() != self.width() {
            return Err(BuchbergerError::WidthMismatch {
                expected: self.width(),
                found: w.len(),
            });
        }
        let mut gv = self.pool.pop()?;
        gv.w.copy_from_slice(w);
        match leading_term(&gv.w, self.r, self.group.nontips()) {
            Some(lt) => self.make_monic(&mut gv, lt)?,
            None => {
                // an image-free vector: it goes straight to the kernel
                gv.dim = usize::MAX;
                gv.pattern = usize::MAX;
            }
        }
        gv.radical = false;
        self.heap.push(gv);
        Ok(())
    }

    /// Scales `gv` to leading coefficient one and records its lead.
    pub(crate) fn make_monic(&self, gv: &mut GeneralVector, lt: LeadingTerm) -> Result<(), BuchbergerError> {
        let field = self.group.field();
        let inv = field.inv(lt.coeff).ok_or(BuchbergerError::ZeroPivot {
            block: lt.block,
            pattern: lt.pattern,
        })?;
        scale(field, &mut gv.w, inv);
        gv.coeff = 1;
        gv.block = lt.block;
        gv.pattern = lt.pattern;
        gv.dim = self.group.pattern_dim(lt.pattern);
        Ok(())
    }

    /// Hands the tail of a vector with vanishing image to the kernel.
    pub(crate) fn offer_kernel(
        &self,
        w: &[u32],
        sink: Option<&mut (dyn KernelSink + '_)>,
    ) -> Result<(), BuchbergerError> {
        if self.s == 0 {
            return Ok(());
        }
        let tail = &w[self.r * self.group.nontips()..];
        match sink {
            Some(sink) if !is_zero(tail) => sink.possibly_new_kernel_generator(tail),
            _ => Ok(()),
        }
    }

    /// Turns a monic general vector into a reduced vector and covers its
    /// cone in the trie.
    pub(crate) fn insert_new_reduced(&mut self, gv: GeneralVector) -> Result<RvId, BuchbergerError> {
        let (block, pattern, dim, heady) = (gv.block, gv.pattern, gv.dim, !gv.radical);
        let w = self.pool.retire(gv);
        let id = self.reduced.push(ReducedVector {
            w,
            block,
            pattern,
            dim,
            exp_dim: dim,
            heady,
        });
        let newly = self.trie.cover(self.group, id, block, pattern)?;
        self.pnontips = self.pnontips.checked_sub(newly).ok_or_else(|| {
            BuchbergerError::Inconsistent("covered more monomials than exist".into())
        })?;
        self.exp_dim = match self.exp_dim {
            ExpDim::NothingToExpand => ExpDim::Dim(dim),
            ExpDim::Dim(e) => ExpDim::Dim(e.min(dim)),
            ExpDim::NoBuchbergerRequired => ExpDim::NoBuchbergerRequired,
        };
        trace!(block, pattern, dim, heady, newly, pnontips = self.pnontips, "new reduced vector");
        Ok(id)
    }

    /// Reduces `w` against every node vector: afterwards no coordinate in
    /// blocks `0..r` sits on a covered monomial.
    ///
    /// # Errors
    ///
    /// Fails on a width mismatch or an inconsistent trie.
    pub fn reduce(&mut self, mut w: Vec<u32>) -> Result<Vec<u32>, BuchbergerError> {
        if w.len() != self.width() {
            return Err(BuchbergerError::WidthMismatch {
                expected: self.width(),
                found: w.len(),
            });
        }
        let group = self.group;
        let field = group.field();
        let n = group.nontips();
        let nor = self.nor();
        for pattern in 0..n {
            for block in 0..self.r {
                let c = w[block * n + pattern];
                if c == 0 || self.trie.node(block, pattern).divisor.is_none() {
                    continue;
                }
                let v = self
                    .slice
                    .node_vector(group, &self.trie, &self.reduced, block, pattern, nor)?;
                add_scaled(field, &mut w, v, field.neg(c));
            }
        }
        Ok(w)
    }

    /// Largest leading length among the heady vectors.
    #[must_use]
    pub fn dimension_of_deepest_heady(&self) -> Option<usize> {
        self.reduced.iter().filter(|rv| rv.heady).map(|rv| rv.dim).max()
    }

    /// True if every heady vector has been reached by the expansion.
    #[must_use]
    pub fn deepest_heady_expanded(&self) -> bool {
        match (self.dimension_of_deepest_heady(), self.exp_dim) {
            (None, _) | (Some(_), ExpDim::NoBuchbergerRequired) => true,
            (Some(h), ExpDim::Dim(d)) => h <= d,
            (Some(_), ExpDim::NothingToExpand) => false,
        }
    }

    /// True once there is nothing left to expand.
    ///
    /// # Errors
    ///
    /// [`BuchbergerError::NoBuchbergerRequired`] if the set was declared
    /// complete.
    pub fn all_expansions_done(&self) -> Result<bool, BuchbergerError> {
        match self.exp_dim {
            ExpDim::NothingToExpand => Ok(true),
            ExpDim::NoBuchbergerRequired => Err(BuchbergerError::NoBuchbergerRequired),
            ExpDim::Dim(d) => Ok(d > self.group.maxlength()),
        }
    }

    /// True if the target is known and already reached.
    #[must_use]
    pub fn easy_correct_rank(&self) -> bool {
        self.target_rank
            .is_some_and(|t| t + self.pnontips == self.r * self.group.nontips())
    }

    /// Tracks progress: resets the patience counter when `pnontips` drops.
    pub fn update_common_buch_status(&mut self) {
        if self.pnontips < self.prev_pnon {
            self.unfruitful = 0;
            self.prev_pnon = self.pnontips;
        } else {
            self.unfruitful += 1;
        }
    }

    /// Resets the progress snapshot to the current state.
    pub fn initialize_status(&mut self) {
        self.prev_pnon = self.pnontips;
        self.unfruitful = 0;
    }

    /// Loads the slice of the frontier.
    ///
    /// # Errors
    ///
    /// Propagates slice storage failures.
    pub fn load_expansion_slice(&mut self) -> Result<(), BuchbergerError> {
        if let ExpDim::Dim(d) = self.exp_dim {
            self.slice.load(d)?;
        }
        Ok(())
    }

    /// Persists the vectors computed by the last sweep.
    ///
    /// # Errors
    ///
    /// Propagates slice storage failures.
    pub fn increment_slice(&mut self) -> Result<(), BuchbergerError> {
        if let ExpDim::Dim(d) = self.exp_dim {
            self.slice.increment(d, self.group)?;
        }
        Ok(())
    }

    /// Releases all slice storage.
    ///
    /// # Errors
    ///
    /// Propagates slice storage failures.
    pub fn destroy_expansion_slice(&mut self) -> Result<(), BuchbergerError> {
        self.slice.destroy()
    }

    /// Checks the structural invariants between outer iterations.
    ///
    /// # Errors
    ///
    /// [`BuchbergerError::Inconsistent`] describing the first violation.
    pub fn verify_invariants(&self) -> Result<(), BuchbergerError> {
        let fail = |msg: String| Err(BuchbergerError::Inconsistent(msg));
        if self.trie.uncovered() != self.pnontips {
            return fail(format!(
                "pnontips is {} but {} monomials are uncovered",
                self.pnontips,
                self.trie.uncovered()
            ));
        }
        for (id, rv) in self.reduced.enumerate() {
            if self.trie.node(rv.block, rv.pattern).divisor != Some(id) {
                return fail(format!("{id:?} does not cover its own leading term"));
            }
            if let ExpDim::Dim(d) = self.exp_dim {
                if rv.exp_dim < d {
                    return fail(format!("{id:?} lags behind the frontier {d}"));
                }
            }
        }
        if let Some(t) = self.target_rank {
            if t + self.pnontips > self.r * self.group.nontips() {
                return fail(format!("target {t} exceeds the remaining room"));
            }
        }
        Ok(())
    }
}
