//! Validation for geographic coordinates, radii, resolutions and ranges.

use crate::error::{HexdexError, Result};
use geo::{Coord, Intersects, Line, LineString, Polygon};
use h3o::Resolution;
use hexdex_types::config::ValueRange;

/// Validates a latitude/longitude pair in degrees.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use hexdex::compute::validation::validate_lat_lng;
///
/// assert!(validate_lat_lng(56.0, 38.0).is_ok());
/// assert!(validate_lat_lng(95.0, 38.0).is_err());
/// assert!(validate_lat_lng(56.0, 200.0).is_err());
/// ```
pub fn validate_lat_lng(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() {
        return Err(HexdexError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !longitude.is_finite() {
        return Err(HexdexError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(HexdexError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(HexdexError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    Ok(())
}

/// Validates a coverage radius in kilometers.
///
/// Only positivity and finiteness are checked; large radii are allowed and
/// simply cost more ring expansions.
///
/// ```
/// use hexdex::compute::validation::validate_radius_km;
///
/// assert!(validate_radius_km(7.0).is_ok());
/// assert!(validate_radius_km(0.0).is_err());
/// assert!(validate_radius_km(f64::NAN).is_err());
/// ```
pub fn validate_radius_km(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() {
        return Err(HexdexError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius_km
        )));
    }
    if radius_km <= 0.0 {
        return Err(HexdexError::InvalidInput(format!(
            "Radius must be positive, got: {}",
            radius_km
        )));
    }
    Ok(())
}

/// Converts a raw resolution level into an H3 [`Resolution`].
///
/// ```
/// use hexdex::compute::validation::validate_resolution;
/// use h3o::Resolution;
///
/// assert_eq!(validate_resolution(9).unwrap(), Resolution::Nine);
/// assert!(validate_resolution(16).is_err());
/// ```
pub fn validate_resolution(level: u8) -> Result<Resolution> {
    Resolution::try_from(level).map_err(|e| {
        HexdexError::InvalidInput(format!("Resolution must be in [0, 15], got {}: {}", level, e))
    })
}

/// Validates that a range is not inverted.
pub fn validate_range(name: &str, range: &ValueRange) -> Result<()> {
    if !range.is_valid() {
        return Err(HexdexError::InvalidInput(format!(
            "{} range is inverted: low ({}) > high ({})",
            name, range.low, range.high
        )));
    }
    Ok(())
}

/// Validates all polygon vertices (exterior and interior rings) and rejects
/// self-intersecting rings.
///
/// Vertices are `x = longitude, y = latitude`.
pub fn validate_polygon(polygon: &Polygon<f64>) -> Result<()> {
    for (idx, coord) in polygon.exterior().coords().enumerate() {
        validate_lat_lng(coord.y, coord.x).map_err(|e| {
            HexdexError::InvalidInput(format!("Exterior ring point at index {}: {}", idx, e))
        })?;
    }

    for (ring_idx, interior) in polygon.interiors().iter().enumerate() {
        for (idx, coord) in interior.coords().enumerate() {
            validate_lat_lng(coord.y, coord.x).map_err(|e| {
                HexdexError::InvalidInput(format!(
                    "Interior ring {} point at index {}: {}",
                    ring_idx, idx, e
                ))
            })?;
        }
    }

    if is_self_intersecting(polygon.exterior()) {
        return Err(HexdexError::invalid_geometry(
            "Exterior ring intersects itself",
        ));
    }
    if let Some(idx) = polygon.interiors().iter().position(is_self_intersecting) {
        return Err(HexdexError::invalid_geometry(format!(
            "Interior ring {} intersects itself",
            idx
        )));
    }

    Ok(())
}

/// Whether two non-adjacent edges of the ring touch or cross.
///
/// Repeated consecutive vertices are ignored and an open ring is treated as
/// closed.
pub fn is_self_intersecting(ring: &LineString<f64>) -> bool {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len() + 1);
    for coord in ring.coords() {
        if coords.last() != Some(coord) {
            coords.push(*coord);
        }
    }
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }

    let edges: Vec<Line<f64>> = coords.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            // first and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return true;
            }
        }
    }
    false
}

/// A polygon whose exterior has fewer than three distinct vertices encloses
/// nothing.
pub fn is_degenerate_polygon(polygon: &Polygon<f64>) -> bool {
    let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(4);
    for coord in polygon.exterior().coords() {
        let xy = (coord.x, coord.y);
        if !distinct.contains(&xy) {
            distinct.push(xy);
            if distinct.len() >= 3 {
                return false;
            }
        }
    }
    true
}
