//! The FGS driver: Gröbner bases of finitely generated submodules.

use modres_algebra::Group;
use modres_linalg::is_zero;
use tracing::{debug, event, instrument, Level};

use crate::config::BuchbergerConfig;
use crate::error::BuchbergerError;
use crate::kernel::KernelSink;
use crate::ngs::Ngs;

/// A Gröbner basis computation for a submodule of a free module of rank
/// `r`, possibly fed generators by an outer RGS while it runs.
#[derive(Debug)]
pub struct Fgs<'g> {
    ngs: Ngs<'g>,
    finished: bool,
    rgs_unfinished: bool,
    max_unfruitful: usize,
    config: BuchbergerConfig,
}

impl<'g> Fgs<'g> {
    /// Creates an FGS on the free module of rank `rank`.
    #[must_use]
    pub fn new(group: &'g Group, rank: usize, config: &BuchbergerConfig) -> Self {
        Self::with_label(group, rank, config, "fgs")
    }

    /// Like [`Fgs::new`], naming the slice store `label`.
    #[must_use]
    pub fn with_label(group: &'g Group, rank: usize, config: &BuchbergerConfig, label: &str) -> Self {
        Self {
            ngs: Ngs::new(group, rank, 0, config, label),
            finished: false,
            rgs_unfinished: false,
            max_unfruitful: config.max_unfruitful,
            config: config.clone(),
        }
    }

    /// Queues a generator.
    ///
    /// # Errors
    ///
    /// Fails on a width mismatch or an exhausted pool.
    pub fn add_generator(&mut self, w: &[u32]) -> Result<(), BuchbergerError> {
        self.ngs.push_generator(w)
    }

    /// Sets the expected dimension of the submodule.
    pub fn set_target_rank(&mut self, target: Option<usize>) {
        self.ngs.set_target_rank(target);
    }

    /// The underlying Gröbner set.
    #[must_use]
    pub fn ngs(&self) -> &Ngs<'g> {
        &self.ngs
    }

    /// Mutable access to the underlying Gröbner set.
    pub fn ngs_mut(&mut self) -> &mut Ngs<'g> {
        &mut self.ngs
    }

    /// Gives up the driver, keeping the Gröbner set.
    #[must_use]
    pub fn into_ngs(self) -> Ngs<'g> {
        self.ngs
    }

    /// True once a Buchberger run has certified the basis.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while an outer RGS may still supply generators.
    #[must_use]
    pub fn rgs_unfinished(&self) -> bool {
        self.rgs_unfinished
    }

    /// Marks whether an outer RGS is still feeding this set.
    pub fn set_rgs_unfinished(&mut self, unfinished: bool) {
        self.rgs_unfinished = unfinished;
    }

    /// See [`Ngs::easy_correct_rank`].
    #[must_use]
    pub fn easy_correct_rank(&self) -> bool {
        self.ngs.easy_correct_rank()
    }

    /// The rank is right either by the target or because nothing can
    /// change any more.
    ///
    /// # Errors
    ///
    /// See [`Ngs::all_expansions_done`].
    pub fn hard_correct_rank(&self) -> Result<bool, BuchbergerError> {
        if self.easy_correct_rank() {
            return Ok(true);
        }
        Ok(!self.rgs_unfinished && self.ngs.heap_len() == 0 && self.ngs.all_expansions_done()?)
    }

    /// True when the basis is complete and every generator was reached
    /// by the expansion.
    ///
    /// # Errors
    ///
    /// See [`Ngs::all_expansions_done`].
    pub fn buchberger_finished(&self) -> Result<bool, BuchbergerError> {
        Ok(self.hard_correct_rank()? && self.ngs.deepest_heady_expanded())
    }

    /// True if it is time to return and let the outer RGS supply more
    /// kernel generators.
    #[must_use]
    pub fn should_fetch_more_generators(&self) -> bool {
        self.rgs_unfinished
            && self.ngs.unfruitful() >= self.max_unfruitful
            && !self.easy_correct_rank()
            && self.ngs.deepest_heady_expanded()
    }

    /// Runs Buchberger until the basis is certified, or until an outer
    /// RGS should supply more generators. A finished FGS first takes in
    /// the generators queued since; if none of them is new it returns at
    /// once, otherwise the run resumes from the frontier they lower.
    ///
    /// On error the expansion slices are destroyed before returning.
    ///
    /// # Errors
    ///
    /// Any [`BuchbergerError`]; entering on a set marked
    /// no-Buchberger-required is an invariant violation.
    #[instrument(skip_all, level = "trace")]
    pub fn n_fgs_buchberger(&mut self) -> Result<(), BuchbergerError> {
        let result = if self.finished { self.resume() } else { self.run() };
        if result.is_err() {
            let _ = self.ngs.destroy_expansion_slice();
        }
        result
    }

    fn resume(&mut self) -> Result<(), BuchbergerError> {
        let before = self.ngs.reduced().len();
        self.ngs.aufnahme(None)?;
        if self.ngs.reduced().len() == before {
            return Ok(());
        }
        self.finished = false;
        self.ngs.initialize_status();
        self.run()
    }

    fn run(&mut self) -> Result<(), BuchbergerError> {
        self.ngs.aufnahme(None)?;
        loop {
            if self.buchberger_finished()? {
                return self.finish();
            }
            let all_done = self.ngs.all_expansions_done()?;
            if all_done {
                // only reachable while an outer RGS still feeds us
                return Ok(());
            }
            self.ngs.load_expansion_slice()?;
            self.ngs.expand(None)?;
            self.ngs.increment_slice()?;
            self.ngs.aufnahme(None)?;
            self.ngs.update_common_buch_status();
            event!(
                Level::DEBUG,
                exp_dim = %self.ngs.exp_dim(),
                pnontips = self.ngs.pnontips(),
                unfruitful = self.ngs.unfruitful(),
                reduced = self.ngs.reduced().len()
            );
            if self.buchberger_finished()? {
                return self.finish();
            }
            if self.should_fetch_more_generators() {
                return Ok(());
            }
        }
    }

    fn finish(&mut self) -> Result<(), BuchbergerError> {
        self.finished = true;
        debug!(
            pnontips = self.ngs.pnontips(),
            reduced = self.ngs.reduced().len(),
            "fgs finished"
        );
        self.ngs.destroy_expansion_slice()
    }

    /// A minimal generating set of the submodule.
    ///
    /// The heady vectors `H` generate the submodule `K`. A second FGS
    /// computes a basis of `K·J` from the products `h·a`; reducing `H`
    /// against it keeps exactly `dim K/KJ` vectors.
    ///
    /// # Errors
    ///
    /// [`BuchbergerError::NotFinished`] before a successful run; otherwise
    /// failures of the inner FGS.
    #[instrument(skip_all, level = "trace")]
    pub fn minimal_generators(&self) -> Result<Vec<Vec<u32>>, BuchbergerError> {
        if !self.finished {
            return Err(BuchbergerError::NotFinished);
        }
        let group = self.ngs.group();
        let rank = self.ngs.r();
        let width = self.ngs.width();
        let heady: Vec<&[u32]> = self
            .ngs
            .reduced()
            .iter()
            .filter(|rv| rv.heady)
            .map(|rv| rv.w.as_slice())
            .collect();

        let mut radical = Fgs::with_label(group, rank, &self.config, "radical");
        let mut product = vec![0u32; width];
        for h in &heady {
            for a in 0..group.arrows() {
                group.multiply_by_arrow(h, a, &mut product, rank);
                if !is_zero(&product) {
                    radical.add_generator(&product)?;
                }
            }
        }
        radical.n_fgs_buchberger()?;

        let before = radical.ngs.reduced().len();
        for h in &heady {
            radical.ngs.push_generator(h)?;
        }
        radical.ngs.aufnahme(None)?;
        let gens: Vec<Vec<u32>> = radical
            .ngs
            .reduced()
            .iter()
            .skip(before)
            .map(|rv| rv.w.clone())
            .collect();
        radical.ngs.destroy_expansion_slice()?;
        debug!(heady = heady.len(), minimal = gens.len(), "minimal generators");
        Ok(gens)
    }
}

impl KernelSink for Fgs<'_> {
    fn possibly_new_kernel_generator(&mut self, tail: &[u32]) -> Result<(), BuchbergerError> {
        self.ngs.push_generator(tail)
    }
}
