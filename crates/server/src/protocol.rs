//! Wire types for the hexdex HTTP API
//!
//! Every successful response is a `{"data": ...}` envelope. Records and
//! buckets go over the wire as positional arrays rather than objects.

use hexdex::{HexdexError, Polygon};
use hexdex_types::record::{AggregateBucket, Record};
use hexdex_types::stats::IndexStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// `[cell_hex, level, group_id]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow(pub String, pub i64, pub i64);

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        RecordRow(record.cell.to_string(), record.level, record.group_id)
    }
}

/// `[ancestor_hex, group_id, median_level]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRow(pub String, pub i64, pub i64);

impl From<&AggregateBucket> for BucketRow {
    fn from(bucket: &AggregateBucket) -> Self {
        BucketRow(
            bucket.ancestor.to_string(),
            bucket.group_id,
            bucket.median_level,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
    pub base_resolution: u8,
    pub stats: IndexStats,
}

impl From<IndexStats> for HealthResponse {
    fn from(stats: IndexStats) -> Self {
        Self {
            status: "ok".to_string(),
            records: stats.record_count,
            base_resolution: stats.base_resolution,
            stats,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentHexParams {
    pub parent_hex: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BorderParams {
    pub border: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionParams {
    pub resolution: u8,
}

/// Parses `lat/lon,lat/lon,...` into a polygon with `x = lon, y = lat`.
///
/// Pairs arrive latitude first, the same order as the index center, and are
/// swapped here because polygon vertices are longitude first. The ring is
/// closed automatically.
///
/// ```
/// use hexdex_server::protocol::parse_border;
///
/// let polygon = parse_border("55.99/37.98,55.99/38.02,56.01/38.0")?;
/// assert_eq!(polygon.exterior().0[0].x, 37.98);
/// assert_eq!(polygon.exterior().0[0].y, 55.99);
/// # Ok::<(), hexdex::HexdexError>(())
/// ```
pub fn parse_border(border: &str) -> Result<Polygon<f64>, HexdexError> {
    let mut coords = Vec::new();
    for pair in border.split(',') {
        let (lat, lon) = pair.split_once('/').ok_or_else(|| {
            HexdexError::invalid_input(format!("Expected lat/lon pair, got {:?}", pair))
        })?;
        coords.push((parse_degrees(lon)?, parse_degrees(lat)?));
    }

    if coords.len() < 3 {
        return Err(HexdexError::invalid_input(format!(
            "Border needs at least 3 points, got {}",
            coords.len()
        )));
    }

    Ok(Polygon::new(coords.into(), Vec::new()))
}

fn parse_degrees(raw: &str) -> Result<f64, HexdexError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| HexdexError::invalid_input(format!("Bad coordinate {:?}: {}", raw, e)))
}
