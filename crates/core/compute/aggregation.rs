//! Median aggregation of record levels by ancestor cell and group id.

use crate::error::{HexdexError, Result};
use crate::storage::RecordStore;
use h3o::{CellIndex, Resolution};
use hexdex_types::record::AggregateBucket;
use rustc_hash::FxHashMap;

/// Groups records under their ancestor at a coarser resolution.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    store: &'a RecordStore,
    base_resolution: Resolution,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(store: &'a RecordStore, base_resolution: Resolution) -> Self {
        Self {
            store,
            base_resolution,
        }
    }

    /// One bucket per `(ancestor at resolution, group_id)` with the median
    /// level of its records.
    ///
    /// Buckets come out in the order their key is first seen while walking
    /// the records, so the output is stable for a given dataset.
    pub fn aggregate(&self, resolution: Resolution) -> Result<Vec<AggregateBucket>> {
        if resolution > self.base_resolution {
            return Err(HexdexError::InvalidInput(format!(
                "Aggregation resolution {} is finer than base resolution {}",
                u8::from(resolution),
                u8::from(self.base_resolution)
            )));
        }

        let mut slots: FxHashMap<(CellIndex, i64), usize> = FxHashMap::default();
        let mut groups: Vec<((CellIndex, i64), Vec<i64>)> = Vec::new();

        for record in self.store.records() {
            let ancestor = record.cell.parent(resolution).ok_or_else(|| {
                HexdexError::invalid_cell(format!(
                    "{} has no ancestor at resolution {}",
                    record.cell,
                    u8::from(resolution)
                ))
            })?;

            let key = (ancestor, record.group_id);
            let slot = *slots.entry(key).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record.level);
        }

        let buckets: Vec<AggregateBucket> = groups
            .into_iter()
            .filter_map(|((ancestor, group_id), mut levels)| {
                let count = levels.len();
                median_upper(&mut levels).map(|median_level| AggregateBucket {
                    ancestor,
                    group_id,
                    median_level,
                    count,
                })
            })
            .collect();

        log::debug!(
            "Aggregated {} records into {} buckets at resolution {}",
            self.store.len(),
            buckets.len(),
            u8::from(resolution)
        );

        Ok(buckets)
    }

    pub fn base_resolution(&self) -> Resolution {
        self.base_resolution
    }
}

/// Element at index `len / 2` after sorting: the middle value for odd
/// lengths, the upper of the two middle values for even lengths.
///
/// # Examples
///
/// ```
/// use hexdex::compute::aggregation::median_upper;
///
/// assert_eq!(median_upper(&mut [30, 10, 20]), Some(20));
/// assert_eq!(median_upper(&mut [40, 10, 30, 20]), Some(30));
/// assert_eq!(median_upper(&mut []), None);
/// ```
pub fn median_upper(values: &mut [i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    Some(values[values.len() / 2])
}
