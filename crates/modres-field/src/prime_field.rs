//! Prime fields with a runtime modulus.
//!
//! Inverses are tabulated when the field is created, which keeps the
//! reduction loops of the Buchberger engine free of extended-gcd calls.

use std::fmt;

use thiserror::Error;

/// The zero residue.
pub const FF_ZERO: u32 = 0;

/// The unit residue.
pub const FF_ONE: u32 = 1;

/// Largest supported characteristic (largest prime below 2^16).
pub const MAX_PRIME: u32 = 65_521;

/// Errors raised when constructing a field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The requested characteristic is not a prime.
    #[error("characteristic {0} is not a prime")]
    NotPrime(u64),

    /// The requested characteristic is prime but too large.
    #[error("characteristic {0} exceeds the supported maximum {MAX_PRIME}")]
    TooLarge(u64),
}

/// The field F_p.
#[derive(Clone, PartialEq, Eq)]
pub struct PrimeField {
    p: u32,
    inverses: Vec<u32>,
}

impl PrimeField {
    /// Creates F_p, rejecting composite or oversized moduli.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPrime`] if `p` is not prime and
    /// [`FieldError::TooLarge`] if it exceeds [`MAX_PRIME`].
    pub fn new(p: u64) -> Result<Self, FieldError> {
        if !is_prime(p) {
            return Err(FieldError::NotPrime(p));
        }
        if p > u64::from(MAX_PRIME) {
            return Err(FieldError::TooLarge(p));
        }
        #[allow(clippy::cast_possible_truncation)]
        let p = p as u32;

        let mut inverses = vec![0u32; p as usize];
        for a in 1..p {
            if inverses[a as usize] == 0 {
                let inv = extended_inverse(a, p);
                inverses[a as usize] = inv;
                inverses[inv as usize] = a;
            }
        }

        Ok(Self { p, inverses })
    }

    /// Returns the characteristic.
    #[must_use]
    pub const fn characteristic(&self) -> u32 {
        self.p
    }

    /// Reduces an arbitrary unsigned value into `0..p`.
    #[must_use]
    pub fn from_u64(&self, value: u64) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let r = (value % u64::from(self.p)) as u32;
        r
    }

    /// Reduces a signed value into `0..p`.
    #[must_use]
    pub fn from_signed(&self, value: i64) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let r = value.rem_euclid(i64::from(self.p)) as u32;
        r
    }

    /// Returns true if `a` is a valid residue.
    #[must_use]
    pub const fn contains(&self, a: u32) -> bool {
        a < self.p
    }

    /// Sum of two residues.
    #[inline]
    #[must_use]
    pub fn add(&self, a: u32, b: u32) -> u32 {
        let s = a + b;
        if s >= self.p {
            s - self.p
        } else {
            s
        }
    }

    /// Difference of two residues.
    #[inline]
    #[must_use]
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        if a >= b {
            a - b
        } else {
            a + self.p - b
        }
    }

    /// Additive inverse.
    #[inline]
    #[must_use]
    pub fn neg(&self, a: u32) -> u32 {
        if a == 0 {
            0
        } else {
            self.p - a
        }
    }

    /// Product of two residues.
    #[inline]
    #[must_use]
    pub fn mul(&self, a: u32, b: u32) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let r = ((u64::from(a) * u64::from(b)) % u64::from(self.p)) as u32;
        r
    }

    /// Multiplicative inverse, `None` for zero.
    #[inline]
    #[must_use]
    pub fn inv(&self, a: u32) -> Option<u32> {
        if a == 0 {
            None
        } else {
            Some(self.inverses[a as usize])
        }
    }

    /// Quotient `a / b`, `None` when `b` is zero.
    #[must_use]
    pub fn div(&self, a: u32, b: u32) -> Option<u32> {
        self.inv(b).map(|inv| self.mul(a, inv))
    }

    /// Computes `a^exp` by binary exponentiation.
    #[must_use]
    pub fn pow(&self, a: u32, mut exp: u64) -> u32 {
        let mut base = a;
        let mut result = FF_ONE;

        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }

        result
    }
}

impl fmt::Debug for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.p)
    }
}

impl fmt::Display for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.p)
    }
}

/// Trial-division primality test.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Returns `v` such that `n = p^v`, or `None` if `n` is not a power of `p`.
#[must_use]
pub fn valuation(p: u64, n: u64) -> Option<u32> {
    if p < 2 || n == 0 {
        return None;
    }
    let mut m = n;
    let mut nu = 0;
    while m % p == 0 {
        m /= p;
        nu += 1;
    }
    (m == 1).then_some(nu)
}

fn extended_inverse(a: u32, p: u32) -> u32 {
    let mut t = 0i64;
    let mut new_t = 1i64;
    let mut r = i64::from(p);
    let mut new_r = i64::from(a);

    while new_r != 0 {
        let quotient = r / new_r;
        (t, new_t) = (new_t, t - quotient * new_t);
        (r, new_r) = (new_r, r - quotient * new_r);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let inv = t.rem_euclid(i64::from(p)) as u32;
    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let f = PrimeField::new(7).unwrap();

        assert_eq!(f.add(5, 4), 2); // 9 = 2 (mod 7)
        assert_eq!(f.sub(5, 4), 1);
        assert_eq!(f.sub(4, 5), 6);
        assert_eq!(f.mul(5, 4), 6); // 20 = 6 (mod 7)
        assert_eq!(f.neg(3), 4);
        assert_eq!(f.neg(0), 0);
    }

    #[test]
    fn test_inverse() {
        let f = PrimeField::new(7).unwrap();

        // 3 * 5 = 15 = 1 (mod 7)
        assert_eq!(f.inv(3), Some(5));
        assert_eq!(f.inv(0), None);
        assert_eq!(f.div(6, 3), Some(2));
    }

    #[test]
    fn test_characteristic_two() {
        let f = PrimeField::new(2).unwrap();
        assert_eq!(f.add(1, 1), 0);
        assert_eq!(f.neg(1), 1);
        assert_eq!(f.inv(1), Some(1));
    }

    #[test]
    fn test_pow() {
        let f = PrimeField::new(7).unwrap();
        assert_eq!(f.pow(3, 0), 1);
        assert_eq!(f.pow(3, 2), 2);
        assert_eq!(f.pow(3, 6), 1); // Fermat
    }

    #[test]
    fn test_signed() {
        let f = PrimeField::new(7).unwrap();
        assert_eq!(f.from_signed(-3), 4);
        assert_eq!(f.from_signed(-14), 0);
        assert_eq!(f.from_u64(23), 2);
    }

    #[test]
    fn test_rejects_composites() {
        assert_eq!(PrimeField::new(9), Err(FieldError::NotPrime(9)));
        assert_eq!(PrimeField::new(1), Err(FieldError::NotPrime(1)));
        assert_eq!(PrimeField::new(65_537), Err(FieldError::TooLarge(65_537)));
    }

    #[test]
    fn test_valuation() {
        assert_eq!(valuation(2, 8), Some(3));
        assert_eq!(valuation(3, 9), Some(2));
        assert_eq!(valuation(2, 1), Some(0));
        assert_eq!(valuation(2, 12), None);
    }
}
