//! The resolution driver: one RGS per degree.

use modres_algebra::{Group, GroupError};
use modres_groebner::{BuchbergerConfig, Fgs, Rgs, SliceBacking};
use tracing::{info, instrument};

use crate::differential::Differential;
use crate::error::ResolutionError;
use crate::store::ResolutionStore;
use crate::urbild::UrbildGb;

/// Settings of a resolution run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Settings passed to every Buchberger run.
    pub buchberger: BuchbergerConfig,
    /// Where files go.
    pub store: ResolutionStore,
    /// Write `d_n` and the urbild bases into the store.
    pub write_differentials: bool,
    /// Keep expansion slices in the store instead of in memory.
    pub disk_slices: bool,
}

impl ResolutionConfig {
    /// Sets the Buchberger settings.
    #[must_use]
    pub fn with_buchberger(mut self, buchberger: BuchbergerConfig) -> Self {
        self.buchberger = buchberger;
        self
    }

    /// Sets the store.
    #[must_use]
    pub fn with_store(mut self, store: ResolutionStore) -> Self {
        self.store = store;
        self
    }

    /// Enables writing differentials.
    #[must_use]
    pub fn with_write_differentials(mut self, write: bool) -> Self {
        self.write_differentials = write;
        self
    }

    /// Enables on-disk expansion slices.
    #[must_use]
    pub fn with_disk_slices(mut self, disk: bool) -> Self {
        self.disk_slices = disk;
        self
    }
}

/// A minimal projective resolution `... -> P_1 -> P_0 -> F_p` of the
/// trivial module, computed degree by degree.
///
/// `P_0` is the algebra itself and `d_0` the augmentation, whose image is
/// one-dimensional.
#[derive(Debug)]
pub struct Resolution<'g> {
    group: &'g Group,
    config: ResolutionConfig,
    differentials: Vec<Differential>,
    urbilds: Vec<UrbildGb<'g>>,
}

impl<'g> Resolution<'g> {
    /// An empty resolution over `group`.
    #[must_use]
    pub fn new(group: &'g Group, config: ResolutionConfig) -> Self {
        Self {
            group,
            config,
            differentials: Vec::new(),
            urbilds: Vec::new(),
        }
    }

    /// The algebra.
    #[must_use]
    pub fn group(&self) -> &'g Group {
        self.group
    }

    /// Highest degree computed so far.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.differentials.len()
    }

    /// Rank of `P_n`, if known.
    #[must_use]
    pub fn rank_proj(&self, n: usize) -> Option<usize> {
        match n {
            0 => Some(1),
            _ => self.differentials.get(n - 1).map(Differential::source_rank),
        }
    }

    /// The ranks of `P_0..=P_degree`.
    #[must_use]
    pub fn ranks(&self) -> Vec<usize> {
        (0..=self.degree()).filter_map(|n| self.rank_proj(n)).collect()
    }

    /// Dimension of `Im d_n`, if known. By exactness it is the dimension
    /// of `P_{n-1}` minus that of `Im d_{n-1}`.
    #[must_use]
    pub fn image_dim(&self, n: usize) -> Option<usize> {
        let nontips = self.group.nontips();
        let mut dim = 1;
        for k in 1..=n {
            dim = self.rank_proj(k - 1)? * nontips - dim;
        }
        Some(dim)
    }

    /// The differential `d_n`, if computed.
    #[must_use]
    pub fn differential(&self, n: usize) -> Option<&Differential> {
        n.checked_sub(1).and_then(|i| self.differentials.get(i))
    }

    /// Computes `d_1`: minimal generators of the radical `J`.
    ///
    /// # Errors
    ///
    /// Buchberger and I/O failures.
    #[instrument(skip_all, level = "trace")]
    pub fn make_first_differential(&mut self) -> Result<(), ResolutionError> {
        if !self.differentials.is_empty() {
            return Ok(());
        }
        let group = self.group;
        let nontips = group.nontips();
        let config = self.step_config(0);
        let mut fgs = Fgs::with_label(group, 1, &config, "radical");
        fgs.set_target_rank(Some(nontips - 1));
        for a in 0..group.arrows() {
            let pattern = group.arrow_pattern(a).ok_or_else(|| {
                GroupError::Inconsistent(format!("arrow {a} is not a nontip"))
            })?;
            fgs.add_generator(&group.unit_vector(0, pattern, 1))?;
        }
        fgs.n_fgs_buchberger()?;
        let images = fgs.minimal_generators()?;
        self.push_differential(Differential::new(1, 1, nontips, images))
    }

    /// Computes the differentials up to `d_n`.
    ///
    /// # Errors
    ///
    /// Buchberger and I/O failures. Differentials computed before the
    /// failure are kept.
    pub fn extend_to(&mut self, n: usize) -> Result<(), ResolutionError> {
        if n == 0 {
            return Ok(());
        }
        self.make_first_differential()?;
        while self.degree() < n {
            self.extend_once()?;
        }
        Ok(())
    }

    /// Computes `d_{k+1}` from the kernel of `d_k`, where `k` is the
    /// current degree.
    #[instrument(skip_all, level = "trace")]
    fn extend_once(&mut self) -> Result<(), ResolutionError> {
        let group = self.group;
        let k = self.degree();
        let d = self
            .differential(k)
            .ok_or(ResolutionError::NotComputed { degree: k })?;
        let (r, s) = (d.target_rank(), d.source_rank());
        let target = self
            .image_dim(k)
            .ok_or(ResolutionError::NotComputed { degree: k })?;

        let config = self.step_config(k);
        let mut rgs = Rgs::new(group, r, s, &config, &format!("d{k}"));
        rgs.set_image_target(Some(target));
        for (i, image) in d.matrix().rows().enumerate() {
            rgs.add_generator(image, i)?;
        }
        rgs.n_rgs_buchberger()?;
        let images = rgs.kernel_generators()?;
        let (image_side, _) = rgs.into_parts();

        let urbild = UrbildGb::new(k, image_side);
        if self.config.write_differentials {
            self.config.store.ensure_dir()?;
            urbild.save(&self.config.store.urbild_gb_file(k))?;
        }
        self.urbilds.push(urbild);
        self.push_differential(Differential::new(k + 1, s, group.nontips(), images))
    }

    /// Preimages under `d_n` of a batch of elements of `P_{n-1}`.
    ///
    /// Available for `n` below the current degree.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::NotComputed`] if no urbild basis exists for `n`;
    /// otherwise see [`UrbildGb::inner_preimages`].
    pub fn inner_preimages(&mut self, n: usize, images: &[Vec<u32>]) -> Result<Vec<Vec<u32>>, ResolutionError> {
        let urbild = n
            .checked_sub(1)
            .and_then(|i| self.urbilds.get_mut(i))
            .ok_or(ResolutionError::NotComputed { degree: n })?;
        urbild.inner_preimages(images)
    }

    fn step_config(&self, k: usize) -> BuchbergerConfig {
        let config = self.config.buchberger.clone();
        if self.config.disk_slices {
            config.with_slices(SliceBacking::Directory(self.config.store.slice_dir(k)))
        } else {
            config
        }
    }

    fn push_differential(&mut self, d: Differential) -> Result<(), ResolutionError> {
        if self.config.write_differentials {
            self.config.store.ensure_dir()?;
            d.save(&self.config.store.differential_file(d.degree()), self.group.p())?;
        }
        info!(degree = d.degree(), rank = d.source_rank(), "differential computed");
        self.differentials.push(d);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modres_algebra::{small_groups, ErrorKind, PathOrdering};
    use modres_linalg::is_zero;

    fn build(g: &small_groups::SmallGroup) -> Group {
        g.builder().build().unwrap()
    }

    fn ranks(group: &Group, n: usize) -> Vec<usize> {
        let mut res = Resolution::new(group, ResolutionConfig::default());
        res.extend_to(n).unwrap();
        res.ranks()
    }

    #[test]
    fn test_cyclic_groups_are_periodic() {
        assert_eq!(ranks(&build(&small_groups::cyclic(2, 1)), 4), vec![1; 5]);
        assert_eq!(ranks(&build(&small_groups::cyclic(2, 2)), 4), vec![1; 5]);
        assert_eq!(ranks(&build(&small_groups::cyclic(3, 1)), 3), vec![1; 4]);
    }

    #[test]
    fn test_rank_two_groups_grow_linearly() {
        let v4 = build(&small_groups::elementary_abelian(2, 2));
        assert_eq!(ranks(&v4, 4), vec![1, 2, 3, 4, 5]);
        let d8 = build(&small_groups::dihedral_8());
        assert_eq!(ranks(&d8, 3), vec![1, 2, 3, 4]);
        let c3c3 = build(&small_groups::elementary_abelian(3, 2));
        assert_eq!(ranks(&c3c3, 3), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_quaternion_group_has_period_four() {
        let q8 = build(&small_groups::quaternion_8());
        assert_eq!(ranks(&q8, 5), vec![1, 2, 2, 1, 1, 2]);
    }

    #[test]
    fn test_jennings_ordering_gives_the_same_ranks() {
        let g = small_groups::elementary_abelian(3, 2)
            .builder()
            .with_ordering(PathOrdering::Jennings)
            .with_dims(vec![1, 1])
            .build()
            .unwrap();
        assert_eq!(ranks(&g, 2), vec![1, 2, 3]);
    }

    #[test]
    fn test_consecutive_differentials_compose_to_zero() {
        let d8 = build(&small_groups::dihedral_8());
        let mut res = Resolution::new(&d8, ResolutionConfig::default());
        res.extend_to(3).unwrap();
        for k in 1..3 {
            let lower = res.differential(k).unwrap();
            let upper = res.differential(k + 1).unwrap();
            for row in upper.matrix().rows() {
                assert!(is_zero(&lower.apply(&d8, row).unwrap()));
            }
        }
    }

    #[test]
    fn test_image_dims_follow_exactness() {
        let v4 = build(&small_groups::elementary_abelian(2, 2));
        let mut res = Resolution::new(&v4, ResolutionConfig::default());
        assert_eq!(res.image_dim(0), Some(1));
        assert_eq!(res.image_dim(1), Some(3));
        assert_eq!(res.image_dim(2), None);
        res.extend_to(2).unwrap();
        assert_eq!(res.image_dim(2), Some(5));
        assert_eq!(res.image_dim(3), Some(7));
    }

    #[test]
    fn test_inner_preimages() {
        let v4 = build(&small_groups::elementary_abelian(2, 2));
        let mut res = Resolution::new(&v4, ResolutionConfig::default());
        res.extend_to(3).unwrap();
        let d2 = res.differential(2).unwrap().clone();
        let xs: Vec<Vec<u32>> = vec![
            v4.unit_vector(0, 1, d2.source_rank()),
            v4.unit_vector(1, 0, d2.source_rank()),
            {
                let mut x = vec![1u32; d2.source_rank() * v4.nontips()];
                x[2] = 0;
                x
            },
        ];
        let ys: Vec<Vec<u32>> = xs.iter().map(|x| d2.apply(&v4, x).unwrap()).collect();
        let pre = res.inner_preimages(2, &ys).unwrap();
        for (y, z) in ys.iter().zip(&pre) {
            assert_eq!(&d2.apply(&v4, z).unwrap(), y);
        }

        // the top of P_1 is not hit by d_2
        let err = res.inner_preimages(2, &[v4.unit_vector(0, 0, 2)]).unwrap_err();
        assert!(matches!(err, ResolutionError::NotInImage { degree: 2 }));
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        let err = res.inner_preimages(3, &[]).unwrap_err();
        assert!(matches!(err, ResolutionError::NotComputed { degree: 3 }));
    }

    #[test]
    fn test_written_files_are_deterministic() {
        let q8 = build(&small_groups::quaternion_8());
        let root = std::env::temp_dir().join(format!("modres-res-{}", std::process::id()));
        let mut bytes = Vec::new();
        for run in ["a", "b"] {
            let store = ResolutionStore::new(&root, run);
            let config = ResolutionConfig::default()
                .with_store(store.clone())
                .with_write_differentials(true)
                .with_disk_slices(true);
            let mut res = Resolution::new(&q8, config);
            res.extend_to(3).unwrap();
            let files: Vec<Vec<u8>> = (1..=3)
                .map(|n| std::fs::read(store.differential_file(n)).unwrap())
                .collect();
            assert!(store.urbild_gb_file(2).exists());
            let loaded = Differential::load(&store.differential_file(3), &q8, 3).unwrap();
            assert_eq!(&loaded, res.differential(3).unwrap());
            bytes.push(files);
        }
        assert_eq!(bytes[0], bytes[1]);
        std::fs::remove_dir_all(&root).unwrap();
    }
}
