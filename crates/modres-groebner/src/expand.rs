//! The expander: one sweep over the covered monomials of one length.

use modres_linalg::leading_term;
use smallvec::SmallVec;
use tracing::{event, instrument, Level};

use crate::error::BuchbergerError;
use crate::kernel::KernelSink;
use crate::ngs::{ExpDim, Ngs};
use crate::slice::SliceEntry;

impl Ngs<'_> {
    /// Multiplies the node vectors of the frontier length by every arrow.
    ///
    /// Products along covered children are node vectors themselves and go
    /// to the expansion slice. A node `R·u` is only multiplied by the
    /// arrows `a` with `u·a` a nontip; the other products are combinations
    /// of longer ones. The remaining products are new candidates: a
    /// nonzero one is made monic and queued, one that vanishes on blocks
    /// `0..r` is offered to `sink`. Afterwards the frontier moves up by one.
    ///
    /// Returns the number of products formed outside the child links.
    ///
    /// # Errors
    ///
    /// [`BuchbergerError::NoBuchbergerRequired`] on a set declared
    /// complete; otherwise pool and trie failures.
    #[instrument(skip_all, level = "trace")]
    pub fn expand(&mut self, mut sink: Option<&mut (dyn KernelSink + '_)>) -> Result<usize, BuchbergerError> {
        let dim = match self.exp_dim {
            ExpDim::NothingToExpand => return Ok(0),
            ExpDim::NoBuchbergerRequired => return Err(BuchbergerError::NoBuchbergerRequired),
            ExpDim::Dim(d) => d,
        };
        let group = self.group;
        let n = group.nontips();
        let nor = self.nor();
        let mut products = 0usize;
        let mut candidates = 0usize;

        for block in 0..self.r {
            for pattern in group.patterns_of_dim(dim) {
                let node = self.trie.node(block, pattern);
                let Some(rv) = node.divisor else {
                    continue;
                };
                if self.reduced.get(rv).exp_dim > dim {
                    continue;
                }
                let qi = node.qi;
                let children: SmallVec<[Option<usize>; 4]> = node.child.clone();
                let w = self
                    .slice
                    .node_vector(group, &self.trie, &self.reduced, block, pattern, nor)?
                    .to_vec();

                for (arrow, child) in children.into_iter().enumerate() {
                    if let Some(c) = child {
                        let mut out = vec![0u32; w.len()];
                        group.multiply_by_arrow(&w, arrow, &mut out, nor);
                        self.slice.stash(
                            group.pattern_dim(c),
                            SliceEntry {
                                block,
                                pattern: c,
                                w: out,
                            },
                        );
                        continue;
                    }
                    if group.paths().child(qi, arrow).is_none() {
                        continue;
                    }
                    products += 1;
                    let mut gv = self.pool.pop()?;
                    group.multiply_by_arrow(&w, arrow, &mut gv.w, nor);
                    match leading_term(&gv.w, self.r, n) {
                        Some(lt) => {
                            self.make_monic(&mut gv, lt)?;
                            gv.radical = true;
                            self.heap.push(gv);
                            candidates += 1;
                        }
                        None => {
                            self.offer_kernel(&gv.w, sink.as_deref_mut())?;
                            self.pool.recycle(gv);
                        }
                    }
                }
            }
        }

        for rv in self.reduced.iter_mut() {
            if rv.exp_dim == dim {
                rv.exp_dim = dim + 1;
            }
        }
        self.exp_dim = ExpDim::Dim(dim + 1);
        event!(Level::TRACE, exp_dim = dim, products, candidates, pnontips = self.pnontips);
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BuchbergerConfig;
    use crate::fgs::Fgs;
    use crate::ngs::{ExpDim, Ngs};
    use modres_algebra::small_groups;

    /// Products the sweep at the current frontier should form, and the
    /// node-arrow pairs it should pass over.
    fn expected_products(ngs: &Ngs<'_>) -> (usize, usize) {
        let ExpDim::Dim(dim) = ngs.exp_dim() else {
            return (0, 0);
        };
        let group = ngs.group();
        let (mut formed, mut skipped) = (0, 0);
        for block in 0..ngs.r() {
            for pattern in group.patterns_of_dim(dim) {
                let node = ngs.trie().node(block, pattern);
                let Some(rv) = node.divisor else { continue };
                if ngs.reduced().get(rv).exp_dim > dim {
                    continue;
                }
                for (arrow, child) in node.child.iter().enumerate() {
                    if child.is_some() {
                        continue;
                    }
                    if group.paths().child(node.qi, arrow).is_some() {
                        formed += 1;
                    } else {
                        skipped += 1;
                    }
                }
            }
        }
        (formed, skipped)
    }

    #[test]
    fn test_quaternion_sweeps_skip_tip_quotients() {
        let group = small_groups::quaternion_8().builder().build().unwrap();
        let config = BuchbergerConfig::default();
        let mut fgs = Fgs::new(&group, 1, &config);
        for a in 0..group.arrows() {
            let p = group.arrow_pattern(a).unwrap();
            fgs.add_generator(&group.unit_vector(0, p, 1)).unwrap();
        }
        let ngs = fgs.ngs_mut();
        ngs.aufnahme(None).unwrap();
        let mut total_skipped = 0;
        while !ngs.all_expansions_done().unwrap() {
            let (formed, skipped) = expected_products(ngs);
            ngs.load_expansion_slice().unwrap();
            assert_eq!(ngs.expand(None).unwrap(), formed);
            ngs.increment_slice().unwrap();
            ngs.aufnahme(None).unwrap();
            total_skipped += skipped;
        }
        assert!(total_skipped > 0);
        assert_eq!(ngs.covered(), group.nontips() - 1);
        ngs.verify_invariants().unwrap();
    }
}
