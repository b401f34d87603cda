//! A small catalogue of p-groups given by permutation generators.

use modres_field::{is_prime, valuation};

use crate::builder::AlgebraBuilder;
use crate::error::GroupError;

/// A named p-group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmallGroup {
    /// Catalogue name.
    pub name: String,
    /// The prime.
    pub p: u32,
    /// Permutation generators, one arrow each.
    pub generators: Vec<Vec<usize>>,
}

impl SmallGroup {
    /// A builder for the basic algebra of this group.
    #[must_use]
    pub fn builder(&self) -> AlgebraBuilder {
        AlgebraBuilder::new(self.p, self.generators.clone())
    }
}

fn cycle(len: usize, offset: usize, degree: usize) -> Vec<usize> {
    (0..degree)
        .map(|i| {
            if (offset..offset + len).contains(&i) {
                offset + (i - offset + 1) % len
            } else {
                i
            }
        })
        .collect()
}

/// The cyclic group of order `p^k`.
#[must_use]
pub fn cyclic(p: u32, k: u32) -> SmallGroup {
    let order = (p as usize).pow(k);
    SmallGroup {
        name: format!("c{order}"),
        p,
        generators: vec![cycle(order, 0, order)],
    }
}

/// The elementary abelian group `(Z/p)^n`.
#[must_use]
pub fn elementary_abelian(p: u32, n: usize) -> SmallGroup {
    let len = p as usize;
    SmallGroup {
        name: format!("c{p}^{n}"),
        p,
        generators: (0..n).map(|j| cycle(len, j * len, n * len)).collect(),
    }
}

/// The dihedral group of order 8, as symmetries of a square.
#[must_use]
pub fn dihedral_8() -> SmallGroup {
    SmallGroup {
        name: "d8".into(),
        p: 2,
        generators: vec![vec![1, 2, 3, 0], vec![0, 3, 2, 1]],
    }
}

/// The quaternion group of order 8 in its regular representation.
///
/// Points `0..8` stand for `1, -1, i, -i, j, -j, k, -k`; the generators
/// are right multiplication by `i` and by `j`.
#[must_use]
pub fn quaternion_8() -> SmallGroup {
    SmallGroup {
        name: "q8".into(),
        p: 2,
        generators: vec![vec![2, 3, 1, 0, 7, 6, 4, 5], vec![4, 5, 6, 7, 1, 0, 3, 2]],
    }
}

/// Looks a group up by name: `c<order>`, `c<p>^<n>`, `d8` or `q8`.
///
/// # Errors
///
/// Returns `InputMalformed` for an unknown name or an order that is not
/// a prime power.
pub fn by_name(name: &str) -> Result<SmallGroup, GroupError> {
    let unknown = || GroupError::Inconsistent(format!("unknown group '{name}'"));
    match name {
        "d8" => return Ok(dihedral_8()),
        "q8" => return Ok(quaternion_8()),
        _ => {}
    }
    let rest = name.strip_prefix('c').ok_or_else(unknown)?;
    if let Some((p, n)) = rest.split_once('^') {
        let p: u32 = p.parse().map_err(|_| unknown())?;
        let n: usize = n.parse().map_err(|_| unknown())?;
        if !is_prime(u64::from(p)) || n == 0 {
            return Err(unknown());
        }
        return Ok(elementary_abelian(p, n));
    }
    let order: u64 = rest.parse().map_err(|_| unknown())?;
    let p = (2..=order).find(|d| order % d == 0).ok_or_else(unknown)?;
    let k = valuation(p, order).ok_or_else(|| GroupError::malformed("group order", order as i64))?;
    let p = u32::try_from(p).map_err(|_| GroupError::malformed("p", order as i64))?;
    Ok(cyclic(p, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        assert_eq!(cycle(3, 2, 6), vec![0, 1, 3, 4, 2, 5]);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("c4").unwrap(), cyclic(2, 2));
        assert_eq!(by_name("c9").unwrap().p, 3);
        assert_eq!(by_name("c3^2").unwrap().generators.len(), 2);
        assert_eq!(by_name("q8").unwrap().name, "q8");
        assert!(by_name("c6").is_err());
        assert!(by_name("s3").is_err());
        assert!(by_name("c1").is_err());
    }
}
