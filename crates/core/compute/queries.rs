//! Children-of-parent and polygon membership queries over a record store.

use crate::compute::validation::{is_degenerate_polygon, validate_polygon};
use crate::error::{HexdexError, Result};
use crate::storage::RecordStore;
use geo::{BoundingRect, Contains, Point, Polygon};
use h3o::geom::{ContainmentMode, TilerBuilder};
use h3o::{CellIndex, LatLng, Resolution};
use hexdex_types::record::Record;

/// Read-only query engine bound to a store and its base resolution.
#[derive(Debug, Clone, Copy)]
pub struct SpatialQueryEngine<'a> {
    store: &'a RecordStore,
    resolution: Resolution,
}

impl<'a> SpatialQueryEngine<'a> {
    pub fn new(store: &'a RecordStore, resolution: Resolution) -> Self {
        Self { store, resolution }
    }

    /// Records whose cell descends from `parent`, in child enumeration order.
    ///
    /// A parent outside the covered area yields an empty list. A parent finer
    /// than the base resolution has no base-resolution descendants and is
    /// rejected.
    pub fn children_of(&self, parent: CellIndex) -> Result<Vec<Record>> {
        let parent_res = parent.resolution();
        if parent_res > self.resolution {
            return Err(HexdexError::InvalidInput(format!(
                "Parent {} has resolution {}, finer than base resolution {}",
                parent,
                u8::from(parent_res),
                u8::from(self.resolution)
            )));
        }

        // Walking every child of a coarse parent costs 7^Δres; past the
        // dataset size a scan of the records is cheaper.
        if parent.children_count(self.resolution) > self.store.len() as u64 {
            return Ok(self.scan_descendants(parent));
        }

        let lookup = self.store.lookup();
        Ok(parent
            .children(self.resolution)
            .filter_map(|cell| lookup.get(&cell).copied())
            .collect())
    }

    /// [`children_of`](Self::children_of) for a hex cell identifier such as
    /// `"8611aa647ffffff"`.
    pub fn children_of_str(&self, parent: &str) -> Result<Vec<Record>> {
        self.children_of(parse_cell(parent)?)
    }

    /// Records whose cell centroid lies inside `polygon`.
    ///
    /// Vertices are `x = longitude, y = latitude`, the reverse of the
    /// `(latitude, longitude)` order used for the index center. Callers
    /// holding latitude-first pairs must swap them. A polygon with fewer than
    /// three distinct vertices yields an empty list.
    pub fn within(&self, polygon: &Polygon<f64>) -> Result<Vec<Record>> {
        if is_degenerate_polygon(polygon) {
            log::debug!("Degenerate polygon, returning no records");
            return Ok(Vec::new());
        }
        validate_polygon(polygon)?;

        // Tiling a polygon much larger than the covered disk enumerates far
        // more cells than the dataset holds; test each record instead.
        if estimated_cell_count(polygon, self.resolution) > self.store.len() as f64 {
            return Ok(self.scan_within(polygon));
        }

        let cells = polygon_cells(polygon, self.resolution)?;
        let lookup = self.store.lookup();
        Ok(cells
            .into_iter()
            .filter_map(|cell| lookup.get(&cell).copied())
            .collect())
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Descendants found by checking each record's ancestor, sorted by index
    /// (the order child enumeration yields).
    fn scan_descendants(&self, parent: CellIndex) -> Vec<Record> {
        let parent_res = parent.resolution();
        let mut matches: Vec<Record> = self
            .store
            .records()
            .iter()
            .filter(|record| record.cell.parent(parent_res) == Some(parent))
            .copied()
            .collect();
        matches.sort_unstable_by_key(|record| record.cell);
        matches
    }

    /// Records whose cell centroid lies inside `polygon`, in dataset order.
    fn scan_within(&self, polygon: &Polygon<f64>) -> Vec<Record> {
        self.store
            .records()
            .iter()
            .filter(|record| {
                let center = LatLng::from(record.cell);
                polygon.contains(&Point::new(center.lng(), center.lat()))
            })
            .copied()
            .collect()
    }
}

/// Rough number of cells at `resolution` the polygon's bounding box spans.
fn estimated_cell_count(polygon: &Polygon<f64>, resolution: Resolution) -> f64 {
    const KM_PER_DEGREE: f64 = 111.32;

    let Some(rect) = polygon.bounding_rect() else {
        return 0.0;
    };
    let width_km = rect.width() * KM_PER_DEGREE * rect.center().y.to_radians().cos().abs();
    let height_km = rect.height() * KM_PER_DEGREE;
    width_km * height_km / resolution.area_km2()
}

/// Parses a hex cell identifier.
///
/// ```
/// use hexdex::compute::queries::parse_cell;
///
/// assert!(parse_cell("8611aa647ffffff").is_ok());
/// assert!(parse_cell("not-a-cell").is_err());
/// ```
pub fn parse_cell(raw: &str) -> Result<CellIndex> {
    raw.trim()
        .parse::<CellIndex>()
        .map_err(|e| HexdexError::InvalidCell(format!("{:?}: {}", raw, e)))
}

/// Cells at `resolution` whose centroid falls inside `polygon` (degrees,
/// `x = longitude`).
pub fn polygon_cells(polygon: &Polygon<f64>, resolution: Resolution) -> Result<Vec<CellIndex>> {
    let mut tiler = TilerBuilder::new(resolution)
        .containment_mode(ContainmentMode::ContainsCentroid)
        .build();
    tiler
        .add(polygon.clone())
        .map_err(|e| HexdexError::invalid_geometry(e.to_string()))?;
    Ok(tiler.into_coverage().collect())
}
