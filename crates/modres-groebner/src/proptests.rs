//! Property-based tests: Gröbner sets against plain linear algebra.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use modres_algebra::{small_groups, Group};
    use modres_linalg::{is_zero, Echelon};

    use crate::config::BuchbergerConfig;
    use crate::fgs::Fgs;

    fn group(index: usize) -> Group {
        let g = match index {
            0 => small_groups::cyclic(2, 2),
            1 => small_groups::elementary_abelian(2, 2),
            _ => small_groups::elementary_abelian(3, 2),
        };
        g.builder().build().unwrap()
    }

    // Raw coefficients, cut to width and reduced mod p in the test body.
    fn raw_vectors() -> impl Strategy<Value = Vec<Vec<u32>>> {
        proptest::collection::vec(proptest::collection::vec(0u32..9, 18), 1..=3)
    }

    fn fit(group: &Group, raw: &[u32], rank: usize) -> Vec<u32> {
        raw[..rank * group.nontips()]
            .iter()
            .map(|&c| c % group.p())
            .collect()
    }

    /// The F_p-span of `g·m` over all generators and nontips of length at
    /// least `from`.
    fn span(group: &Group, gens: &[Vec<u32>], rank: usize, from: usize) -> Echelon {
        let mut ech = Echelon::new(rank * group.nontips());
        for g in gens {
            for m in group.ds()[from.min(group.maxlength() + 1)]..group.nontips() {
                ech.insert(group.field(), group.multiply_by_pattern(g, m, rank));
            }
        }
        ech
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn fgs_covers_the_span(index in 0usize..3, rank in 1usize..=2, raw in raw_vectors()) {
            let group = group(index);
            let gens: Vec<Vec<u32>> = raw.iter().map(|v| fit(&group, v, rank)).collect();
            let mut fgs = Fgs::new(&group, rank, &BuchbergerConfig::default());
            for g in &gens {
                fgs.add_generator(g).unwrap();
            }
            fgs.n_fgs_buchberger().unwrap();

            prop_assert!(fgs.is_finished());
            prop_assert_eq!(fgs.ngs().heap_len(), 0);
            prop_assert!(fgs.ngs().verify_invariants().is_ok());
            prop_assert_eq!(fgs.ngs().covered(), span(&group, &gens, rank, 0).rank());
        }

        #[test]
        fn reduction_decides_membership(
            index in 0usize..3,
            raw in raw_vectors(),
            probe in proptest::collection::vec(0u32..9, 18),
        ) {
            let group = group(index);
            let gens: Vec<Vec<u32>> = raw.iter().map(|v| fit(&group, v, 1)).collect();
            let mut fgs = Fgs::new(&group, 1, &BuchbergerConfig::default());
            for g in &gens {
                fgs.add_generator(g).unwrap();
            }
            fgs.n_fgs_buchberger().unwrap();

            let probe = fit(&group, &probe, 1);
            let ech = span(&group, &gens, 1, 0);
            let reduced = fgs.ngs_mut().reduce(probe.clone()).unwrap();
            prop_assert_eq!(is_zero(&reduced), ech.contains(group.field(), &probe));
        }

        #[test]
        fn minimal_generators_count_the_top(index in 0usize..3, raw in raw_vectors()) {
            let group = group(index);
            let gens: Vec<Vec<u32>> = raw.iter().map(|v| fit(&group, v, 1)).collect();
            let mut fgs = Fgs::new(&group, 1, &BuchbergerConfig::default());
            for g in &gens {
                fgs.add_generator(g).unwrap();
            }
            fgs.n_fgs_buchberger().unwrap();

            let top = span(&group, &gens, 1, 0).rank() - span(&group, &gens, 1, 1).rank();
            prop_assert_eq!(fgs.minimal_generators().unwrap().len(), top);
        }

        #[test]
        fn pnontips_never_grows(index in 0usize..3, raw in raw_vectors()) {
            let group = group(index);
            let gens: Vec<Vec<u32>> = raw.iter().map(|v| fit(&group, v, 1)).collect();
            let mut fgs = Fgs::new(&group, 1, &BuchbergerConfig::default());
            let mut last = fgs.ngs().pnontips();
            for g in &gens {
                fgs.add_generator(g).unwrap();
                fgs.ngs_mut().aufnahme(None).unwrap();
                prop_assert!(fgs.ngs().pnontips() <= last);
                last = fgs.ngs().pnontips();
            }
        }
    }
}
