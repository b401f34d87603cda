//! Cross-module tests for modres-linalg.

#[cfg(test)]
mod integration_tests {
    use modres_field::PrimeField;

    use crate::dense_matrix::DenseMatrix;
    use crate::echelon::Echelon;
    use crate::row_ops::{leading_term, multiply_blocks};

    #[test]
    fn test_block_multiply_matches_mm() {
        let f = PrimeField::new(3).unwrap();
        let a = DenseMatrix::from_rows(vec![vec![0, 1, 2], vec![0, 0, 1], vec![0, 0, 0]], 3);
        let w = DenseMatrix::from_rows(vec![vec![1, 2, 0], vec![2, 0, 1]], 3);

        let expected = w.mm(&a, &f);
        let flat: Vec<u32> = w.data().to_vec();
        let mut out = vec![0u32; 6];
        multiply_blocks(&f, &flat, &a, &mut out, 2);
        assert_eq!(out, expected.data());
    }

    #[test]
    fn test_inverse_via_echelon_matches_rank() {
        let f = PrimeField::new(2).unwrap();
        let m = DenseMatrix::from_rows(
            vec![vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![0, 0, 1, 1], vec![0, 0, 0, 1]],
            4,
        );
        assert_eq!(m.rank(&f), 4);
        let inv = m.inverse(&f).unwrap();
        assert_eq!(inv.mm(&m, &f), DenseMatrix::identity(4));
    }

    #[test]
    fn test_echelon_pivots_are_leading_terms() {
        let f = PrimeField::new(7).unwrap();
        let mut e = Echelon::new(4);
        e.insert(&f, vec![0, 3, 1, 0]);
        e.insert(&f, vec![0, 3, 1, 5]);
        let pivots: Vec<_> = e.pivots().collect();
        assert_eq!(pivots, vec![1, 3]);
        let lt = leading_term(&[0, 0, 4, 0], 1, 4).unwrap();
        assert_eq!(lt.pattern, 2);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use modres_field::PrimeField;

    use crate::dense_matrix::DenseMatrix;
    use crate::echelon::Echelon;

    fn matrix_entries(n: usize) -> impl Strategy<Value = Vec<u32>> {
        proptest::collection::vec(0u32..5, n * n)
    }

    proptest! {
        #[test]
        fn inverse_is_two_sided(entries in matrix_entries(4)) {
            let f = PrimeField::new(5).unwrap();
            let m = DenseMatrix::from_data(entries, 4, 4).unwrap();
            if let Some(inv) = m.inverse(&f) {
                prop_assert_eq!(m.mm(&inv, &f), DenseMatrix::identity(4));
                prop_assert_eq!(inv.mm(&m, &f), DenseMatrix::identity(4));
            } else {
                prop_assert!(m.rank(&f) < 4);
            }
        }

        #[test]
        fn solve_reconstructs_members(entries in matrix_entries(3), coeffs in proptest::collection::vec(0u32..5, 3)) {
            let f = PrimeField::new(5).unwrap();
            let m = DenseMatrix::from_data(entries, 3, 3).unwrap();
            let mut e = Echelon::with_tracking(3, 3);
            for row in m.rows() {
                e.insert(&f, row.to_vec());
            }
            let mut target = vec![0u32; 3];
            for (i, &c) in coeffs.iter().enumerate() {
                crate::row_ops::add_scaled(&f, &mut target, m.row(i), c);
            }
            let solution = e.solve(&f, &target).unwrap();
            let mut check = vec![0u32; 3];
            for (i, &c) in solution.iter().enumerate() {
                crate::row_ops::add_scaled(&f, &mut check, m.row(i), c);
            }
            prop_assert_eq!(check, target);
        }
    }
}
