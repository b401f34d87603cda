//! Incremental row echelon form.
//!
//! Rows are kept monic at their pivot, which is always their first nonzero
//! entry. Reducing a vector only ever looks at its current leading entry,
//! so insertion order does not need to be sorted by pivot.

use modres_field::PrimeField;

use crate::row_ops::{add_scaled, scale};

/// An echelon basis of a subspace of F_p^width.
#[derive(Debug, Clone)]
pub struct Echelon {
    width: usize,
    rows: Vec<Vec<u32>>,
    /// `pivot_row[c]` is the row whose pivot is column `c`.
    pivot_row: Vec<Option<usize>>,
    /// When tracking, `combos[i]` writes row `i` in terms of the inserted sources.
    combos: Option<Vec<Vec<u32>>>,
    sources: usize,
    source_capacity: usize,
}

impl Echelon {
    /// Creates an empty echelon form for vectors of the given width.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            pivot_row: vec![None; width],
            combos: None,
            sources: 0,
            source_capacity: 0,
        }
    }

    /// Creates an echelon form that records how each row arises from the
    /// inserted vectors, so that [`Echelon::solve`] can express vectors in
    /// terms of them. At most `max_sources` vectors may be inserted.
    #[must_use]
    pub fn with_tracking(width: usize, max_sources: usize) -> Self {
        Self {
            combos: Some(Vec::new()),
            source_capacity: max_sources,
            ..Self::new(width)
        }
    }

    /// Vector width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of independent rows.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    /// Pivot columns in insertion order.
    pub fn pivots(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.iter().position(|&x| x != 0))
    }

    /// Reduces `v` in place; returns the combination of rows subtracted
    /// (indexed by row) when `record` is set.
    fn reduce_in_place(&self, field: &PrimeField, v: &mut [u32], mut record: Option<&mut Vec<u32>>) {
        let mut start = 0;
        while let Some(offset) = v[start..].iter().position(|&x| x != 0) {
            let col = start + offset;
            let Some(row) = self.pivot_row[col] else {
                start = col + 1;
                continue;
            };
            let c = v[col];
            add_scaled(field, v, &self.rows[row], field.neg(c));
            if let Some(rec) = record.as_deref_mut() {
                rec[row] = field.add(rec[row], c);
            }
            start = col + 1;
        }
    }

    /// Returns the remainder of `v` modulo the span.
    #[must_use]
    pub fn reduce(&self, field: &PrimeField, v: &[u32]) -> Vec<u32> {
        let mut w = v.to_vec();
        self.reduce_in_place(field, &mut w, None);
        w
    }

    /// Returns true if `v` lies in the span.
    #[must_use]
    pub fn contains(&self, field: &PrimeField, v: &[u32]) -> bool {
        self.reduce(field, v).iter().all(|&x| x == 0)
    }

    /// Inserts `v`; returns false if it was already in the span.
    ///
    /// # Panics
    ///
    /// Panics on a width mismatch or when a tracking form receives more
    /// vectors than it was created for.
    pub fn insert(&mut self, field: &PrimeField, mut v: Vec<u32>) -> bool {
        assert_eq!(v.len(), self.width, "vector width mismatch");
        let source = self.sources;
        self.sources += 1;

        let mut record = self.combos.as_ref().map(|_| vec![0u32; self.rows.len()]);
        self.reduce_in_place(field, &mut v, record.as_mut());

        let Some(col) = v.iter().position(|&x| x != 0) else {
            return false;
        };
        let inv = field.inv(v[col]).unwrap_or(1);
        scale(field, &mut v, inv);

        if let (Some(combos), Some(record)) = (self.combos.as_mut(), record) {
            assert!(source < self.source_capacity, "too many tracked sources");
            // new row = inv * (source - sum record[i] * row_i)
            let mut combo = vec![0u32; self.source_capacity];
            combo[source] = 1;
            for (i, &c) in record.iter().enumerate() {
                if c != 0 {
                    add_scaled(field, &mut combo, &combos[i], field.neg(c));
                }
            }
            scale(field, &mut combo, inv);
            combos.push(combo);
        }

        self.pivot_row[col] = Some(self.rows.len());
        self.rows.push(v);
        true
    }

    /// Expresses `v` as a combination of the inserted vectors.
    ///
    /// Returns `None` if `v` is not in the span or tracking is disabled.
    /// Vectors that were rejected by [`Echelon::insert`] get coefficient zero.
    #[must_use]
    pub fn solve(&self, field: &PrimeField, v: &[u32]) -> Option<Vec<u32>> {
        let combos = self.combos.as_ref()?;
        let mut w = v.to_vec();
        let mut record = vec![0u32; self.rows.len()];
        self.reduce_in_place(field, &mut w, Some(&mut record));
        if w.iter().any(|&x| x != 0) {
            return None;
        }
        let mut result = vec![0u32; self.source_capacity];
        for (i, &c) in record.iter().enumerate() {
            if c != 0 {
                add_scaled(field, &mut result, &combos[i], c);
            }
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_and_membership() {
        let f = PrimeField::new(3).unwrap();
        let mut e = Echelon::new(3);
        assert!(e.insert(&f, vec![1, 2, 0]));
        assert!(e.insert(&f, vec![0, 1, 1]));
        assert!(!e.insert(&f, vec![1, 0, 1])); // (1,2,0) + (0,1,1)
        assert_eq!(e.rank(), 2);
        assert!(e.contains(&f, &[2, 1, 0]));
        assert!(!e.contains(&f, &[0, 0, 1]));
    }

    #[test]
    fn test_solve() {
        let f = PrimeField::new(5).unwrap();
        let mut e = Echelon::with_tracking(3, 3);
        e.insert(&f, vec![1, 1, 0]);
        e.insert(&f, vec![0, 2, 1]);
        e.insert(&f, vec![3, 0, 4]);

        let target = [2, 4, 3];
        let coeffs = e.solve(&f, &target).unwrap();
        let sources = [[1u32, 1, 0], [0, 2, 1], [3, 0, 4]];
        let mut check = vec![0u32; 3];
        for (c, s) in coeffs.iter().zip(sources.iter()) {
            add_scaled(&f, &mut check, s, *c);
        }
        assert_eq!(check, target);
    }

    #[test]
    fn test_solve_outside_span() {
        let f = PrimeField::new(2).unwrap();
        let mut e = Echelon::with_tracking(2, 1);
        e.insert(&f, vec![1, 1]);
        assert!(e.solve(&f, &[1, 0]).is_none());
        assert_eq!(e.solve(&f, &[1, 1]), Some(vec![1]));
    }
}
