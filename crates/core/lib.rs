//! In-memory H3 hexagon index with synthetic per-cell attributes.
//!
//! ## Features
//! - **Disk coverage**: ring-by-ring expansion around a center point until the
//!   covered cell area reaches the area of a circle of the configured radius
//! - **Children queries**: every record under a coarser parent cell
//! - **Polygon queries**: every record whose cell centroid lies in a polygon
//! - **Median aggregation**: median `level` per coarser ancestor and `group_id`
//! - **Lookup strategies**: cache the cell lookup once, or rebuild it per query
//!
//! The dataset is generated once at startup and never mutated, so the index
//! can be shared across threads behind an `Arc` with no locking.
//!
//! ```rust
//! use hexdex::prelude::*;
//! use geo::polygon;
//!
//! let index = HexIndex::builder()
//!     .base_resolution(9)
//!     .center(56.0, 38.0)
//!     .radius_km(7.0)
//!     .seed(42)
//!     .build()?;
//!
//! // Children of the res-7 parent of the center cell
//! let parent = index.center().parent(Resolution::Seven).unwrap();
//! let children = index.children_of(parent)?;
//!
//! // Polygon vertices are (lon, lat)
//! let area = polygon![
//!     (x: 37.98, y: 55.99),
//!     (x: 38.02, y: 55.99),
//!     (x: 38.02, y: 56.01),
//!     (x: 37.98, y: 56.01),
//! ];
//! let inside = index.within(&area)?;
//!
//! let buckets = index.aggregate(Resolution::Six)?;
//! # let _ = (children, inside, buckets);
//! # Ok::<(), hexdex::HexdexError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod storage;

pub use builder::IndexBuilder;
pub use error::{HexdexError, Result};
pub use index::HexIndex;

pub use geo::Polygon;
pub use h3o::{CellIndex, Resolution};
pub use hexdex_types::record::{AggregateBucket, Record};

pub use config::{Config, IndexStats, LookupStrategy, ValueRange};

pub use compute::{AggregationEngine, Coverage, GridCoverageBuilder, SpatialQueryEngine};

// Re-export validation and parsing helpers
pub use compute::validation;
pub use compute::{median_upper, parse_cell};

pub use storage::{CellLookup, RecordStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{HexIndex, HexdexError, IndexBuilder, Result};

    pub use crate::{CellIndex, Polygon, Resolution};

    pub use crate::{AggregateBucket, Record};

    pub use crate::{Config, IndexStats, LookupStrategy, ValueRange};

    pub use crate::validation;
}
