//! Index builder
//!
//! Runs the one-time startup pipeline: validate configuration, expand the
//! disk coverage, then draw the synthetic dataset.

use crate::compute::coverage::GridCoverageBuilder;
use crate::config::{Config, LookupStrategy, ValueRange};
use crate::error::{HexdexError, Result};
use crate::index::HexIndex;
use crate::storage::RecordStore;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Builder for [`HexIndex`].
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    config: Config,
    seed: Option<u64>,
}

impl IndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            seed: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Center point, latitude first.
    pub fn center(mut self, latitude: f64, longitude: f64) -> Self {
        self.config = self.config.with_center(latitude, longitude);
        self
    }

    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.config = self.config.with_radius_km(radius_km);
        self
    }

    pub fn base_resolution(mut self, resolution: u8) -> Self {
        self.config = self.config.with_base_resolution(resolution);
        self
    }

    pub fn level_range(mut self, range: impl Into<ValueRange>) -> Self {
        self.config = self.config.with_level_range(range);
        self
    }

    pub fn group_id_range(mut self, range: impl Into<ValueRange>) -> Self {
        self.config = self.config.with_group_id_range(range);
        self
    }

    pub fn lookup(mut self, lookup: LookupStrategy) -> Self {
        self.config = self.config.with_lookup(lookup);
        self
    }

    /// Draw attributes from a seeded RNG so the dataset is reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the index. Any invalid setting fails here and no dataset is
    /// produced.
    pub fn build(self) -> Result<HexIndex> {
        let config = self.config;
        config.validate()?;
        let resolution = config.resolution()?;

        let coverage = GridCoverageBuilder::new(resolution)
            .build(config.center_latitude, config.center_longitude, config.radius_km)
            .map_err(HexdexError::into_config)?;

        let center = coverage.center();
        let ring_count = coverage.ring_count();
        let covered_area_km2 = coverage.area_km2();
        let target_area_km2 = coverage.target_area_km2();
        let cells = coverage.into_cells();

        let store = match self.seed {
            Some(seed) => RecordStore::generate_with_rng(
                cells,
                config.level,
                config.group_id,
                config.lookup,
                &mut StdRng::seed_from_u64(seed),
            )?,
            None => RecordStore::generate(cells, config.level, config.group_id, config.lookup)?,
        };

        log::info!(
            "Built hex index around ({}, {}) r={} km: {} cells at resolution {} in {} rings, {:?} lookup",
            config.center_latitude,
            config.center_longitude,
            config.radius_km,
            store.len(),
            config.base_resolution,
            ring_count,
            config.lookup
        );

        Ok(HexIndex {
            config,
            resolution,
            center,
            ring_count,
            covered_area_km2,
            target_area_km2,
            store,
        })
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
