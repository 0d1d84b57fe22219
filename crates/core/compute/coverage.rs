//! Disk coverage by ring expansion around a center cell.
//!
//! The target disk area uses the planar formula `π · r²`; the error against
//! the true spherical cap is negligible at city scale and is accepted.

use crate::compute::validation::{validate_lat_lng, validate_radius_km};
use crate::error::{HexdexError, Result};
use h3o::{CellIndex, LatLng, Resolution};
use rustc_hash::FxHashSet;
use std::f64::consts::PI;

/// Cells covering a disk, grouped by ring distance from the center cell.
#[derive(Debug, Clone)]
pub struct Coverage {
    center: CellIndex,
    rings: Vec<Vec<CellIndex>>,
    area_km2: f64,
    target_area_km2: f64,
}

impl Coverage {
    pub fn center(&self) -> CellIndex {
        self.center
    }

    /// Rings in expansion order; `rings()[0]` is the center cell alone.
    pub fn rings(&self) -> &[Vec<CellIndex>] {
        &self.rings
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Summed area of every covered cell, km².
    pub fn area_km2(&self) -> f64 {
        self.area_km2
    }

    pub fn target_area_km2(&self) -> f64 {
        self.target_area_km2
    }

    pub fn len(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All covered cells, ring by ring.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.rings.iter().flatten().copied()
    }

    pub fn to_set(&self) -> FxHashSet<CellIndex> {
        self.cells().collect()
    }

    pub fn into_cells(self) -> Vec<CellIndex> {
        self.rings.into_iter().flatten().collect()
    }
}

/// Computes the base-resolution cells whose summed area reaches a disk's area.
#[derive(Debug, Clone, Copy)]
pub struct GridCoverageBuilder {
    resolution: Resolution,
}

impl GridCoverageBuilder {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Expands rings around the cell containing `(latitude, longitude)` until
    /// their summed area reaches `π · radius_km²`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexdex::compute::coverage::GridCoverageBuilder;
    /// use h3o::Resolution;
    ///
    /// let coverage = GridCoverageBuilder::new(Resolution::Nine)
    ///     .build(56.0, 38.0, 7.0)?;
    /// assert!(coverage.area_km2() >= coverage.target_area_km2());
    /// # Ok::<(), hexdex::HexdexError>(())
    /// ```
    pub fn build(&self, latitude: f64, longitude: f64, radius_km: f64) -> Result<Coverage> {
        validate_lat_lng(latitude, longitude)?;
        validate_radius_km(radius_km)?;

        let center = LatLng::new(latitude, longitude)
            .map_err(|e| HexdexError::invalid_input(e.to_string()))?
            .to_cell(self.resolution);

        let target_area_km2 = PI * radius_km * radius_km;

        let mut rings = Vec::new();
        let mut seen = FxHashSet::default();
        let mut area_km2 = 0.0;
        let mut distance = 0u32;

        while area_km2 < target_area_km2 {
            let mut ring = ring_cells(center, distance);
            ring.retain(|cell| seen.insert(*cell));

            if ring.is_empty() {
                log::warn!(
                    "Ring {} around {} is empty: the whole sphere is covered ({:.1} of {:.1} km²)",
                    distance,
                    center,
                    area_km2,
                    target_area_km2
                );
                break;
            }

            area_km2 += ring.iter().map(|cell| cell.area_km2()).sum::<f64>();
            rings.push(ring);
            distance += 1;
        }

        let coverage = Coverage {
            center,
            rings,
            area_km2,
            target_area_km2,
        };

        log::debug!(
            "Covered r={} km around {} with {} cells in {} rings ({:.3} / {:.3} km²)",
            radius_km,
            center,
            coverage.len(),
            coverage.ring_count(),
            coverage.area_km2,
            coverage.target_area_km2
        );

        Ok(coverage)
    }
}

/// Cells at exactly `distance` steps from `center`.
///
/// The fast hollow-ring walk fails near pentagons; the safe disk traversal
/// filtered to the outer distance is used then.
fn ring_cells(center: CellIndex, distance: u32) -> Vec<CellIndex> {
    let fast: Option<Vec<CellIndex>> = center.grid_ring_fast(distance).collect();
    match fast {
        Some(cells) => cells,
        None => {
            log::warn!(
                "Fast ring walk failed at distance {} around {}, using safe traversal",
                distance,
                center
            );
            center
                .grid_disk_distances_safe(distance)
                .filter_map(|(cell, d)| (d == distance).then_some(cell))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> GridCoverageBuilder {
        GridCoverageBuilder::new(Resolution::Nine)
    }

    #[test]
    fn test_reference_scenario() {
        let coverage = builder().build(56.0, 38.0, 7.0).unwrap();
        assert!(!coverage.is_empty());
        assert_eq!(coverage.center().resolution(), Resolution::Nine);
        assert!(coverage.cells().all(|c| c.resolution() == Resolution::Nine));
    }

    #[test]
    fn test_termination_bounds() {
        let coverage = builder().build(56.0, 38.0, 7.0).unwrap();
        let target = coverage.target_area_km2();
        assert!((target - PI * 49.0).abs() < 1e-9);
        assert!(coverage.area_km2() >= target);

        let outer = coverage.rings().last().unwrap();
        let outer_area: f64 = outer.iter().map(|c| c.area_km2()).sum();
        assert!(coverage.area_km2() - outer_area < target);
    }

    #[test]
    fn test_area_matches_cells() {
        let coverage = builder().build(56.0, 38.0, 2.0).unwrap();
        let summed: f64 = coverage.cells().map(|c| c.area_km2()).sum();
        assert!((summed - coverage.area_km2()).abs() < 1e-9);
    }

    #[test]
    fn test_no_duplicates() {
        let coverage = builder().build(56.0, 38.0, 7.0).unwrap();
        assert_eq!(coverage.to_set().len(), coverage.len());
    }

    #[test]
    fn test_rings_are_hexagonal() {
        let coverage = builder().build(56.0, 38.0, 3.0).unwrap();
        assert_eq!(coverage.rings()[0], vec![coverage.center()]);
        for (k, ring) in coverage.rings().iter().enumerate().skip(1) {
            assert_eq!(ring.len(), 6 * k);
        }
    }

    #[test]
    fn test_larger_radius_is_superset() {
        let small = builder().build(56.0, 38.0, 7.0).unwrap();
        let large = builder().build(56.0, 38.0, 14.0).unwrap();
        assert!(large.len() > small.len());

        let large_set = large.to_set();
        assert!(small.cells().all(|c| large_set.contains(&c)));
    }

    #[test]
    fn test_tiny_radius_returns_center_only() {
        let coverage = builder().build(56.0, 38.0, 0.01).unwrap();
        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage.ring_count(), 1);
        let center = LatLng::new(56.0, 38.0).unwrap().to_cell(Resolution::Nine);
        assert_eq!(coverage.into_cells(), vec![center]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(builder().build(91.0, 38.0, 7.0).is_err());
        assert!(builder().build(56.0, -181.0, 7.0).is_err());
        assert!(builder().build(56.0, 38.0, 0.0).is_err());
        assert!(builder().build(56.0, 38.0, -3.0).is_err());
        assert!(builder().build(f64::NAN, 38.0, 7.0).is_err());
    }

    #[test]
    fn test_coarse_resolution() {
        let coverage = GridCoverageBuilder::new(Resolution::Four)
            .build(56.0, 38.0, 7.0)
            .unwrap();
        // A single resolution 4 cell (~1770 km²) already exceeds a 7 km disk.
        assert_eq!(coverage.len(), 1);
    }

    #[test]
    fn test_pentagon_center_uses_safe_rings() {
        let pentagon = Resolution::Nine.pentagons().next().unwrap();
        let center = LatLng::from(pentagon);

        let coverage = builder().build(center.lat(), center.lng(), 3.0).unwrap();
        assert_eq!(coverage.center(), pentagon);
        assert!(coverage.center().is_pentagon());
        assert_eq!(coverage.to_set().len(), coverage.len());
        assert!(coverage.rings().iter().all(|ring| !ring.is_empty()));

        let target = coverage.target_area_km2();
        assert!(coverage.area_km2() >= target);
        let outer: f64 = coverage.rings().last().unwrap().iter().map(|c| c.area_km2()).sum();
        assert!(coverage.area_km2() - outer < target);
    }

    #[test]
    fn test_whole_sphere_stops_when_rings_run_out() {
        let coverage = GridCoverageBuilder::new(Resolution::Zero)
            .build(56.0, 38.0, 20_000.0)
            .unwrap();
        // Every resolution 0 cell, yet still short of a 20000 km planar disk.
        assert_eq!(coverage.len(), 122);
        assert_eq!(coverage.to_set().len(), 122);
        assert!(coverage.area_km2() < coverage.target_area_km2());
    }
}
