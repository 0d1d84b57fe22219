//! The hexdex index: coverage, dataset and the query surface over them.

use crate::builder::IndexBuilder;
use crate::compute::aggregation::AggregationEngine;
use crate::compute::queries::SpatialQueryEngine;
use crate::config::{Config, IndexStats};
use crate::error::Result;
use crate::storage::{CellLookup, RecordStore};
use geo::Polygon;
use h3o::{CellIndex, Resolution};
use hexdex_types::record::{AggregateBucket, Record};
use std::borrow::Cow;

/// In-memory H3 index over a synthetic dataset.
///
/// Built once from a [`Config`] and never mutated afterwards, so a shared
/// `Arc<HexIndex>` can serve queries from many threads without locking.
///
/// ```rust
/// use hexdex::{Config, HexIndex};
///
/// let index = HexIndex::builder()
///     .config(Config::default().with_base_resolution(9))
///     .seed(7)
///     .build()?;
///
/// let parent = index.center().parent(h3o::Resolution::Seven).unwrap();
/// let children = index.children_of(parent)?;
/// assert!(!children.is_empty());
///
/// let buckets = index.aggregate(h3o::Resolution::Six)?;
/// assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), index.len());
/// # Ok::<(), hexdex::HexdexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HexIndex {
    pub(crate) config: Config,
    pub(crate) resolution: Resolution,
    pub(crate) center: CellIndex,
    pub(crate) ring_count: usize,
    pub(crate) covered_area_km2: f64,
    pub(crate) target_area_km2: f64,
    pub(crate) store: RecordStore,
}

impl HexIndex {
    pub fn builder() -> IndexBuilder {
        IndexBuilder::new()
    }

    /// Build an index from configuration with an unseeded RNG.
    pub fn new(config: Config) -> Result<Self> {
        IndexBuilder::new().config(config).build()
    }

    /// Records under `parent` at the base resolution.
    pub fn children_of(&self, parent: CellIndex) -> Result<Vec<Record>> {
        self.query_engine().children_of(parent)
    }

    /// Records under the parent given as a hex identifier.
    pub fn children_of_str(&self, parent: &str) -> Result<Vec<Record>> {
        self.query_engine().children_of_str(parent)
    }

    /// Records whose cell centroid lies inside `polygon`.
    ///
    /// Polygon vertices are `(longitude, latitude)`, unlike the
    /// `(latitude, longitude)` center in [`Config`].
    pub fn within(&self, polygon: &Polygon<f64>) -> Result<Vec<Record>> {
        self.query_engine().within(polygon)
    }

    /// Median level per `(ancestor at resolution, group_id)`.
    pub fn aggregate(&self, resolution: Resolution) -> Result<Vec<AggregateBucket>> {
        self.aggregation_engine().aggregate(resolution)
    }

    pub fn query_engine(&self) -> SpatialQueryEngine<'_> {
        SpatialQueryEngine::new(&self.store, self.resolution)
    }

    pub fn aggregation_engine(&self) -> AggregationEngine<'_> {
        AggregationEngine::new(&self.store, self.resolution)
    }

    pub fn lookup(&self) -> Cow<'_, CellLookup> {
        self.store.lookup()
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_resolution(&self) -> Resolution {
        self.resolution
    }

    /// Cell containing the configured center point.
    pub fn center(&self) -> CellIndex {
        self.center
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            record_count: self.store.len(),
            base_resolution: u8::from(self.resolution),
            ring_count: self.ring_count,
            covered_area_km2: self.covered_area_km2,
            target_area_km2: self.target_area_km2,
            lookup: self.store.strategy(),
        }
    }
}
