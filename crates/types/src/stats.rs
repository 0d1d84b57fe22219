use crate::config::LookupStrategy;
use serde::{Deserialize, Serialize};

/// Index statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of records in the dataset
    pub record_count: usize,
    /// Resolution every record's cell is stored at
    pub base_resolution: u8,
    /// Rings expanded around the center cell (including ring 0)
    pub ring_count: usize,
    /// Summed area of all covered cells, km²
    pub covered_area_km2: f64,
    /// Planar disk area the coverage had to reach, km²
    pub target_area_km2: f64,
    pub lookup: LookupStrategy,
}

impl IndexStats {
    /// How much the covered area overshoots the target disk (1.0 = exact).
    pub fn coverage_ratio(&self) -> f64 {
        if self.target_area_km2 > 0.0 {
            self.covered_area_km2 / self.target_area_km2
        } else {
            0.0
        }
    }
}
