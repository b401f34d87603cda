//! Property-based tests for prime field arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::PrimeField;

    fn small_prime() -> impl Strategy<Value = u64> {
        prop_oneof![Just(2u64), Just(3), Just(5), Just(7), Just(101), Just(65_521)]
    }

    proptest! {
        #[test]
        fn add_commutative(p in small_prime(), a in 0u64..100_000, b in 0u64..100_000) {
            let f = PrimeField::new(p).unwrap();
            let (a, b) = (f.from_u64(a), f.from_u64(b));
            prop_assert_eq!(f.add(a, b), f.add(b, a));
        }

        #[test]
        fn distributive(p in small_prime(), a in 0u64..100_000, b in 0u64..100_000, c in 0u64..100_000) {
            let f = PrimeField::new(p).unwrap();
            let (a, b, c) = (f.from_u64(a), f.from_u64(b), f.from_u64(c));
            prop_assert_eq!(f.mul(a, f.add(b, c)), f.add(f.mul(a, b), f.mul(a, c)));
        }

        #[test]
        fn sub_inverts_add(p in small_prime(), a in 0u64..100_000, b in 0u64..100_000) {
            let f = PrimeField::new(p).unwrap();
            let (a, b) = (f.from_u64(a), f.from_u64(b));
            prop_assert_eq!(f.sub(f.add(a, b), b), a);
            prop_assert_eq!(f.add(a, f.neg(a)), 0);
        }

        #[test]
        fn inverse_is_two_sided(p in small_prime(), a in 1u64..100_000) {
            let f = PrimeField::new(p).unwrap();
            let a = f.from_u64(a);
            prop_assume!(a != 0);
            let inv = f.inv(a).unwrap();
            prop_assert_eq!(f.mul(a, inv), 1);
            prop_assert_eq!(f.mul(inv, a), 1);
        }
    }
}
