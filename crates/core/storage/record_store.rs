//! Immutable record storage with a cell-to-record lookup view.

use crate::compute::validation::validate_range;
use crate::error::{HexdexError, Result};
use h3o::CellIndex;
use hexdex_types::config::{LookupStrategy, ValueRange};
use hexdex_types::record::Record;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Mapping from a base-resolution cell to its record.
pub type CellLookup = FxHashMap<CellIndex, Record>;

/// Holds the generated dataset.
///
/// The record list never changes after construction. With
/// [`LookupStrategy::Cached`] the lookup map is built once here and borrowed
/// on every [`lookup`](Self::lookup); with [`LookupStrategy::Recompute`] it is
/// rebuilt from the list on each call.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    strategy: LookupStrategy,
    cached: Option<CellLookup>,
}

impl RecordStore {
    /// Draws `level` and `group_id` uniformly (inclusive bounds) for every cell.
    pub fn generate(
        cells: impl IntoIterator<Item = CellIndex>,
        level: ValueRange,
        group_id: ValueRange,
        strategy: LookupStrategy,
    ) -> Result<Self> {
        Self::generate_with_rng(cells, level, group_id, strategy, &mut rand::thread_rng())
    }

    /// Same as [`generate`](Self::generate) with a caller-supplied RNG.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexdex::storage::RecordStore;
    /// use hexdex_types::config::{LookupStrategy, ValueRange};
    /// use h3o::{LatLng, Resolution};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let cell = LatLng::new(56.0, 38.0)?.to_cell(Resolution::Nine);
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let store = RecordStore::generate_with_rng(
    ///     [cell],
    ///     ValueRange::new(-120, -47),
    ///     ValueRange::new(0, 100),
    ///     LookupStrategy::Cached,
    ///     &mut rng,
    /// )?;
    /// assert_eq!(store.len(), 1);
    /// assert!((-120..=-47).contains(&store.records()[0].level));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn generate_with_rng<R: Rng>(
        cells: impl IntoIterator<Item = CellIndex>,
        level: ValueRange,
        group_id: ValueRange,
        strategy: LookupStrategy,
        rng: &mut R,
    ) -> Result<Self> {
        validate_range("level", &level).map_err(HexdexError::into_config)?;
        validate_range("group_id", &group_id).map_err(HexdexError::into_config)?;

        let records: Vec<Record> = cells
            .into_iter()
            .map(|cell| {
                Record::new(
                    cell,
                    rng.gen_range(level.as_range()),
                    rng.gen_range(group_id.as_range()),
                )
            })
            .collect();

        log::debug!(
            "Generated {} records (level {}, group_id {}, {:?} lookup)",
            records.len(),
            level,
            group_id,
            strategy
        );

        Ok(Self::from_records(records, strategy))
    }

    /// Wraps explicit records. When a cell repeats, the later record wins in
    /// the lookup.
    pub fn from_records(records: Vec<Record>, strategy: LookupStrategy) -> Self {
        let cached = match strategy {
            LookupStrategy::Cached => Some(index_records(&records)),
            LookupStrategy::Recompute => None,
        };

        Self {
            records,
            strategy,
            cached,
        }
    }

    /// Cell-to-record view of the dataset.
    pub fn lookup(&self) -> Cow<'_, CellLookup> {
        match &self.cached {
            Some(map) => Cow::Borrowed(map),
            None => Cow::Owned(index_records(&self.records)),
        }
    }

    /// Single-cell lookup without materializing the whole map.
    pub fn get(&self, cell: &CellIndex) -> Option<Record> {
        match &self.cached {
            Some(map) => map.get(cell).copied(),
            None => self.records.iter().rev().find(|r| r.cell == *cell).copied(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    /// Rebuilds the store around the same records with another strategy.
    pub fn with_strategy(self, strategy: LookupStrategy) -> Self {
        if strategy == self.strategy {
            return self;
        }
        Self::from_records(self.records, strategy)
    }
}

fn index_records(records: &[Record]) -> CellLookup {
    let mut map = CellLookup::default();
    map.reserve(records.len());
    for record in records {
        map.insert(record.cell, *record);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::coverage::GridCoverageBuilder;
    use h3o::Resolution;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cells() -> Vec<CellIndex> {
        GridCoverageBuilder::new(Resolution::Nine)
            .build(56.0, 38.0, 2.0)
            .unwrap()
            .into_cells()
    }

    fn store(strategy: LookupStrategy, seed: u64) -> RecordStore {
        let mut rng = StdRng::seed_from_u64(seed);
        RecordStore::generate_with_rng(
            cells(),
            ValueRange::new(-120, -47),
            ValueRange::new(0, 100),
            strategy,
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_values_within_ranges() {
        let store = store(LookupStrategy::Cached, 1);
        assert_eq!(store.len(), cells().len());
        for record in store.records() {
            assert!((-120..=-47).contains(&record.level));
            assert!((0..=100).contains(&record.group_id));
        }
    }

    #[test]
    fn test_single_value_ranges() {
        let store = RecordStore::generate(
            cells(),
            ValueRange::new(-50, -50),
            ValueRange::new(3, 3),
            LookupStrategy::Recompute,
        )
        .unwrap();
        assert!(store.records().iter().all(|r| r.level == -50 && r.group_id == 3));
    }

    #[test]
    fn test_inverted_range_is_config_error() {
        let err = RecordStore::generate(
            cells(),
            ValueRange::new(-47, -120),
            ValueRange::new(0, 100),
            LookupStrategy::Cached,
        )
        .unwrap_err();
        assert!(matches!(err, HexdexError::InvalidConfig(_)));
    }

    #[test]
    fn test_cached_and_recompute_lookups_match() {
        let cached = store(LookupStrategy::Cached, 42);
        let recompute = store(LookupStrategy::Recompute, 42);

        assert_eq!(cached.records(), recompute.records());
        assert_eq!(*cached.lookup(), *recompute.lookup());
        assert_eq!(cached.lookup().len(), cached.len());
    }

    #[test]
    fn test_cached_lookup_is_borrowed() {
        let cached = store(LookupStrategy::Cached, 3);
        assert!(matches!(cached.lookup(), Cow::Borrowed(_)));

        let recompute = cached.with_strategy(LookupStrategy::Recompute);
        assert_eq!(recompute.strategy(), LookupStrategy::Recompute);
        assert!(matches!(recompute.lookup(), Cow::Owned(_)));
    }

    #[test]
    fn test_get_matches_lookup() {
        for strategy in [LookupStrategy::Cached, LookupStrategy::Recompute] {
            let store = store(strategy, 9);
            let lookup = store.lookup();
            for record in store.records() {
                assert_eq!(store.get(&record.cell), Some(*record));
                assert_eq!(lookup.get(&record.cell), Some(record));
            }
        }
    }

    #[test]
    fn test_duplicate_cell_last_wins() {
        let cell = cells()[0];
        let records = vec![Record::new(cell, -100, 1), Record::new(cell, -60, 2)];

        for strategy in [LookupStrategy::Cached, LookupStrategy::Recompute] {
            let store = RecordStore::from_records(records.clone(), strategy);
            assert_eq!(store.get(&cell), Some(Record::new(cell, -60, 2)));
            assert_eq!(store.lookup()[&cell].group_id, 2);
        }
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::from_records(Vec::new(), LookupStrategy::Cached);
        assert!(store.is_empty());
        assert!(store.lookup().is_empty());
    }
}
