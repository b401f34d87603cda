//! The RGS driver: image and kernel of a map of free modules at once.

use modres_algebra::Group;
use modres_field::FF_ONE;
use tracing::{debug, error, event, instrument, Level};

use crate::config::BuchbergerConfig;
use crate::error::BuchbergerError;
use crate::fgs::Fgs;
use crate::kernel::KernelSink;
use crate::ngs::Ngs;

/// A Gröbner basis of the image of `F^s -> F^r` that feeds the zero
/// reductions of its generators into a Gröbner basis of the kernel.
///
/// Generator `i` is stored as `(image_i | e_i)`: the image in blocks
/// `0..r` and the unit of block `r + i` as bookkeeping, so that every
/// vector of the image set remembers which combination produced it.
#[derive(Debug)]
pub struct Rgs<'g> {
    ngs: Ngs<'g>,
    ker: Fgs<'g>,
    prev_ker_pnon: usize,
    overshoot: usize,
    finished: bool,
}

impl<'g> Rgs<'g> {
    /// Creates an RGS for maps from rank `s` to rank `r`. The slice
    /// stores are named after `label`.
    #[must_use]
    pub fn new(group: &'g Group, r: usize, s: usize, config: &BuchbergerConfig, label: &str) -> Self {
        let ker = Fgs::with_label(group, s, config, &format!("{label}-kernel"));
        Self {
            ngs: Ngs::new(group, r, s, config, &format!("{label}-image")),
            prev_ker_pnon: ker.ngs().pnontips(),
            ker,
            overshoot: config.overshoot,
            finished: false,
        }
    }

    /// Sets the expected image dimension, and with it the kernel's.
    pub fn set_image_target(&mut self, target: Option<usize>) {
        let room = self.ngs.s() * self.ngs.group().nontips();
        self.ngs.set_target_rank(target);
        self.ker.set_target_rank(target.and_then(|t| room.checked_sub(t)));
    }

    /// Queues the image of the `index`-th basis element of the source.
    ///
    /// # Errors
    ///
    /// Fails if `image` does not have `r` blocks, or on an exhausted pool.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a source block.
    pub fn add_generator(&mut self, image: &[u32], index: usize) -> Result<(), BuchbergerError> {
        let n = self.ngs.group().nontips();
        let r = self.ngs.r();
        assert!(index < self.ngs.s(), "source block {index} out of range");
        if image.len() != r * n {
            return Err(BuchbergerError::WidthMismatch {
                expected: r * n,
                found: image.len(),
            });
        }
        let mut w = vec![0u32; self.ngs.width()];
        w[..r * n].copy_from_slice(image);
        w[(r + index) * n] = FF_ONE;
        self.ngs.push_generator(&w)
    }

    /// The image Gröbner set.
    #[must_use]
    pub fn image(&self) -> &Ngs<'g> {
        &self.ngs
    }

    /// The kernel FGS.
    #[must_use]
    pub fn kernel(&self) -> &Fgs<'g> {
        &self.ker
    }

    /// True after a successful run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Splits into the image set and the kernel FGS.
    #[must_use]
    pub fn into_parts(self) -> (Ngs<'g>, Fgs<'g>) {
        (self.ngs, self.ker)
    }

    /// Minimal generators of the kernel, as vectors with `s` blocks.
    ///
    /// # Errors
    ///
    /// See [`Fgs::minimal_generators`].
    pub fn kernel_generators(&self) -> Result<Vec<Vec<u32>>, BuchbergerError> {
        self.ker.minimal_generators()
    }

    /// Decides whether the kernel FGS is worth running now.
    ///
    /// Only once the image has its full rank. Then either no further
    /// kernel generators can arrive, or the image has been unfruitful for
    /// exactly `overshoot` rounds, or for longer while the kernel is still
    /// gaining.
    #[must_use]
    pub fn appropriate_to_perform_heady_buchberger(&self) -> bool {
        if !self.ngs.easy_correct_rank() {
            return false;
        }
        let unfruitful = self.ngs.unfruitful();
        !self.ker.rgs_unfinished()
            || unfruitful == self.overshoot
            || (unfruitful > self.overshoot && self.ker.ngs().pnontips() < self.prev_ker_pnon)
    }

    /// Checks that the kernel leaves exactly as many monomials uncovered
    /// as the image covers. Passes when the image dimension is unknown.
    ///
    /// # Errors
    ///
    /// [`BuchbergerError::RankMismatch`].
    pub fn check_ranks_correct(&self) -> Result<(), BuchbergerError> {
        let Some(expected) = self.ngs.target_rank() else {
            return Ok(());
        };
        let found = self.ker.ngs().pnontips();
        if found != expected {
            error!(expected, found, "kernel rank does not match the image");
            return Err(BuchbergerError::RankMismatch { expected, found });
        }
        Ok(())
    }

    /// Runs Buchberger on the image, feeding the kernel, until the kernel
    /// basis is certified. A finished RGS returns at once.
    ///
    /// On error both sets of expansion slices are destroyed.
    ///
    /// # Errors
    ///
    /// Any [`BuchbergerError`], including a rank mismatch between kernel
    /// and image.
    #[instrument(skip_all, level = "trace")]
    pub fn n_rgs_buchberger(&mut self) -> Result<(), BuchbergerError> {
        if self.finished {
            return Ok(());
        }
        let result = self.run();
        if result.is_err() {
            let _ = self.ngs.destroy_expansion_slice();
            let _ = self.ker.ngs_mut().destroy_expansion_slice();
        }
        result
    }

    fn run(&mut self) -> Result<(), BuchbergerError> {
        self.ker.set_rgs_unfinished(true);
        {
            let sink: &mut dyn KernelSink = &mut self.ker;
            self.ngs.aufnahme(Some(sink))?;
        }
        self.ngs.initialize_status();
        self.ker.ngs_mut().aufnahme(None)?;

        while !self.ngs.all_expansions_done()? {
            self.prev_ker_pnon = self.ker.ngs().pnontips();
            {
                let sink: &mut dyn KernelSink = &mut self.ker;
                self.ngs.load_expansion_slice()?;
                self.ngs.expand(Some(&mut *sink))?;
                self.ngs.increment_slice()?;
                self.ngs.aufnahme(Some(sink))?;
            }
            if self.ngs.all_expansions_done()? {
                self.ker.set_rgs_unfinished(false);
            }
            self.ngs.update_common_buch_status();
            self.ker.ngs_mut().aufnahme(None)?;
            event!(
                Level::DEBUG,
                exp_dim = %self.ngs.exp_dim(),
                image = self.ngs.covered(),
                kernel = self.ker.ngs().covered(),
                unfruitful = self.ngs.unfruitful()
            );
            if self.appropriate_to_perform_heady_buchberger() {
                self.ker.n_fgs_buchberger()?;
                if self.ker.is_finished() {
                    break;
                }
            }
        }

        self.ker.set_rgs_unfinished(false);
        if !self.ker.is_finished() {
            self.ker.n_fgs_buchberger()?;
        }
        self.check_ranks_correct()?;
        self.finished = true;
        debug!(
            image = self.ngs.covered(),
            kernel = self.ker.ngs().covered(),
            "rgs finished"
        );
        self.ngs.destroy_expansion_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modres_algebra::{small_groups, ErrorKind, PathOrdering};

    fn group(g: &small_groups::SmallGroup) -> Group {
        g.builder()
            .with_ordering(PathOrdering::ReverseLengthLex)
            .build()
            .unwrap()
    }

    /// The map `F^arrows -> F` sending `e_a` to the arrow `a`.
    fn arrow_map<'g>(group: &'g Group, target: Option<usize>) -> Rgs<'g> {
        let config = BuchbergerConfig::default();
        let mut rgs = Rgs::new(group, 1, group.arrows(), &config, "d1");
        rgs.set_image_target(target);
        for a in 0..group.arrows() {
            let p = group.arrow_pattern(a).unwrap();
            rgs.add_generator(&group.unit_vector(0, p, 1), a).unwrap();
        }
        rgs
    }

    #[test]
    fn test_kernel_of_c2() {
        let g = group(&small_groups::cyclic(2, 1));
        let mut rgs = arrow_map(&g, Some(1));
        rgs.n_rgs_buchberger().unwrap();
        assert!(rgs.is_finished());
        assert_eq!(rgs.kernel().ngs().covered(), 1);
        let gens = rgs.kernel_generators().unwrap();
        assert_eq!(gens, vec![vec![0, 1]]);
    }

    #[test]
    fn test_kernel_of_v4() {
        let g = group(&small_groups::elementary_abelian(2, 2));
        let mut rgs = arrow_map(&g, Some(3));
        rgs.n_rgs_buchberger().unwrap();
        assert_eq!(rgs.image().covered(), 3);
        assert_eq!(rgs.kernel().ngs().covered(), 5);
        assert_eq!(rgs.kernel_generators().unwrap().len(), 3);
        rgs.kernel().ngs().verify_invariants().unwrap();
    }

    #[test]
    fn test_unknown_target_runs_to_the_end() {
        let g = group(&small_groups::elementary_abelian(2, 2));
        let mut rgs = arrow_map(&g, None);
        rgs.n_rgs_buchberger().unwrap();
        assert_eq!(rgs.kernel().ngs().covered(), 5);
        assert_eq!(rgs.kernel_generators().unwrap().len(), 3);
    }

    #[test]
    fn test_wrong_target_is_a_rank_mismatch() {
        let g = group(&small_groups::elementary_abelian(2, 2));
        let mut rgs = arrow_map(&g, Some(2));
        let err = rgs.n_rgs_buchberger().unwrap_err();
        assert!(matches!(
            err,
            BuchbergerError::RankMismatch {
                expected: 2,
                found: 3
            }
        ));
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert!(!rgs.is_finished());
    }

    #[test]
    fn test_generator_width_is_checked() {
        let g = group(&small_groups::cyclic(2, 1));
        let mut rgs = Rgs::new(&g, 1, 1, &BuchbergerConfig::default(), "w");
        let err = rgs.add_generator(&[0, 1, 0], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputMalformed);
    }

    #[test]
    fn test_heady_buchberger_waits_for_image_rank() {
        let g = group(&small_groups::elementary_abelian(2, 2));
        let rgs = arrow_map(&g, Some(3));
        assert!(!rgs.appropriate_to_perform_heady_buchberger());
    }
}
