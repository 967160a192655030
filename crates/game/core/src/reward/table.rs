//! Weighted random selection.
//!
//! [`WeightedTable`] is the one sampling primitive of the crate. Reward
//! tables, crystal level rolls and any other chance-based feature go through
//! it.

use rand::Rng;

use super::RewardError;

/// One `(item, weight)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedEntry<T> {
    pub item: T,
    pub weight: f64,
}

/// Ordered weighted entries with a precomputed total.
///
/// Immutable once built; share it freely across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedTable<T> {
    entries: Vec<WeightedEntry<T>>,
    total: f64,
}

impl<T> WeightedTable<T> {
    /// Builds a table from `(item, weight)` pairs in declaration order.
    ///
    /// A table with zero entries is allowed to exist; selecting from it
    /// fails with [`RewardError::EmptyTable`].
    ///
    /// # Errors
    ///
    /// - [`RewardError::InvalidWeight`] for a weight that is not a finite
    ///   positive number
    /// - [`RewardError::TotalOverflow`] if the weights sum past `f64::MAX`
    pub fn new(entries: impl IntoIterator<Item = (T, f64)>) -> Result<Self, RewardError> {
        let mut total = 0.0;
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, (item, weight))| {
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(RewardError::InvalidWeight { index, weight });
                }
                total += weight;
                Ok(WeightedEntry { item, weight })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !total.is_finite() {
            return Err(RewardError::TotalOverflow);
        }

        Ok(Self { entries, total })
    }

    /// Builds a table where every item has the same chance.
    pub fn uniform(items: impl IntoIterator<Item = T>) -> Self {
        let entries: Vec<_> = items
            .into_iter()
            .map(|item| WeightedEntry { item, weight: 1.0 })
            .collect();
        let total = entries.len() as f64;
        Self { entries, total }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    /// Selects the entry for a draw `r` in `[0, total_weight)`.
    ///
    /// Walks the entries in order and returns the first one whose cumulative
    /// weight exceeds `r`. With entries `[(A, 50), (B, 50)]`, `r = 49.999`
    /// selects A and `r = 50.0` selects B. If rounding leaves no entry
    /// matched, the last entry is returned.
    pub fn pick(&self, r: f64) -> Result<&T, RewardError> {
        let last = self.entries.last().ok_or(RewardError::EmptyTable)?;

        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.weight;
            if r < cumulative {
                return Ok(&entry.item);
            }
        }
        Ok(&last.item)
    }

    /// Draws uniformly from `[0, total_weight)` and selects.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T, RewardError> {
        if self.entries.is_empty() {
            return Err(RewardError::EmptyTable);
        }
        let r = rng.gen_range(0.0..self.total);
        self.pick(r)
    }

    /// Chance of the entry at `index` being selected, in `[0, 1]`.
    pub fn probability_of(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|e| e.weight / self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn halves() -> WeightedTable<&'static str> {
        WeightedTable::new([("A", 50.0), ("B", 50.0)]).unwrap()
    }

    #[test]
    fn boundary_belongs_to_next_entry() {
        let table = halves();
        assert_eq!(table.pick(0.0), Ok(&"A"));
        assert_eq!(table.pick(49.999), Ok(&"A"));
        assert_eq!(table.pick(50.0), Ok(&"B"));
        assert_eq!(table.pick(99.999), Ok(&"B"));
    }

    #[test]
    fn overshoot_falls_back_to_last() {
        let table = halves();
        assert_eq!(table.pick(100.0), Ok(&"B"));
        assert_eq!(table.pick(f64::MAX), Ok(&"B"));
    }

    #[test]
    fn empty_table_never_grants() {
        let table = WeightedTable::new(Vec::<(u8, f64)>::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(table.pick(0.0), Err(RewardError::EmptyTable));
        assert_eq!(table.sample(&mut rng), Err(RewardError::EmptyTable));
    }

    #[test]
    fn rejects_bad_weights() {
        assert_eq!(
            WeightedTable::new([("a", 1.0), ("b", 0.0)]).unwrap_err(),
            RewardError::InvalidWeight {
                index: 1,
                weight: 0.0
            }
        );
        assert!(WeightedTable::new([("a", -2.0)]).is_err());
        assert!(WeightedTable::new([("a", f64::NAN)]).is_err());
        assert!(WeightedTable::new([("a", f64::INFINITY)]).is_err());
    }

    #[test]
    fn rejects_weights_that_overflow_the_total() {
        assert_eq!(
            WeightedTable::new([("A", 1e308), ("B", 1e308)]).unwrap_err(),
            RewardError::TotalOverflow
        );

        // Large weights that still sum to a finite total sample normally.
        let table = WeightedTable::new([("A", 8e307), ("B", 8e307)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(table.sample(&mut rng).is_ok());
    }

    #[test]
    fn frequencies_match_weights() {
        const DRAWS: usize = 20_000;
        let table = WeightedTable::new([(0usize, 70.0), (1, 20.0), (2, 10.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [0usize; 3];

        for _ in 0..DRAWS {
            counts[*table.sample(&mut rng).unwrap()] += 1;
        }

        for (index, count) in counts.iter().enumerate() {
            let observed = *count as f64 / DRAWS as f64;
            let expected = table.probability_of(index).unwrap();
            assert!(
                (observed - expected).abs() < 0.02,
                "entry {index}: observed {observed:.4}, expected {expected:.2}"
            );
        }
    }
}
