//! Aufnahme: draining the unreduced heap into the reduced set.

use modres_linalg::{add_scaled, leading_term_from, LeadingTerm};
use tracing::{event, instrument, Level};

use crate::error::BuchbergerError;
use crate::kernel::KernelSink;
use crate::ngs::Ngs;
use crate::vector::GeneralVector;

impl Ngs<'_> {
    /// Pops every queued vector, reduces it and either inserts it as a
    /// new reduced vector or, when it vanishes on blocks `0..r`, offers its
    /// tail to `sink`.
    ///
    /// Leaves the heap empty.
    ///
    /// # Errors
    ///
    /// Propagates pool, trie and arithmetic failures.
    #[instrument(skip_all, level = "trace")]
    pub fn aufnahme(
        &mut self,
        mut sink: Option<&mut (dyn KernelSink + '_)>,
    ) -> Result<(), BuchbergerError> {
        let mut inserted = 0usize;
        let mut vanished = 0usize;
        while let Some(mut gv) = self.heap.pop() {
            match self.reduce_to_lead(&mut gv)? {
                Some(lt) => {
                    self.make_monic(&mut gv, lt)?;
                    self.insert_new_reduced(gv)?;
                    inserted += 1;
                }
                None => {
                    self.offer_kernel(&gv.w, sink.as_deref_mut())?;
                    self.pool.recycle(gv);
                    vanished += 1;
                }
            }
        }
        event!(
            Level::TRACE,
            inserted,
            vanished,
            pnontips = self.pnontips,
            reduced = self.reduced.len()
        );
        Ok(())
    }

    /// Subtracts node vectors until the leading term of `gv` is uncovered.
    /// Returns that term, or `None` if blocks `0..r` vanish.
    fn reduce_to_lead(&mut self, gv: &mut GeneralVector) -> Result<Option<LeadingTerm>, BuchbergerError> {
        let group = self.group;
        let field = group.field();
        let n = group.nontips();
        let nor = self.nor();
        let mut start = 0;
        loop {
            let Some(lt) = leading_term_from(&gv.w, self.r, n, start) else {
                return Ok(None);
            };
            if self.trie.node(lt.block, lt.pattern).divisor.is_none() {
                return Ok(Some(lt));
            }
            let v = self
                .slice
                .node_vector(group, &self.trie, &self.reduced, lt.block, lt.pattern, nor)?;
            add_scaled(field, &mut gv.w, v, field.neg(lt.coeff));
            start = lt.pattern;
        }
    }
}
