//! Property-based tests for preimages.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use modres_algebra::{small_groups, Group};

    use crate::resolution::{Resolution, ResolutionConfig};

    fn d8() -> Group {
        small_groups::dihedral_8().builder().build().unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn preimages_map_back(
            degree in 1usize..=2,
            x in proptest::collection::vec(0u32..2, 24),
        ) {
            let group = d8();
            let mut res = Resolution::new(&group, ResolutionConfig::default());
            res.extend_to(3).unwrap();
            let d = res.differential(degree).unwrap().clone();
            let x = &x[..d.source_rank() * group.nontips()];
            let y = d.apply(&group, x).unwrap();
            let z = res.inner_preimages(degree, &[y.clone()]).unwrap();
            prop_assert_eq!(d.apply(&group, &z[0]).unwrap(), y);
        }
    }
}
