//! Coverage construction, spatial queries, aggregation and input validation.

pub mod aggregation;
pub mod coverage;
pub mod queries;
pub mod validation;

pub use aggregation::{AggregationEngine, median_upper};
pub use coverage::{Coverage, GridCoverageBuilder};
pub use queries::{SpatialQueryEngine, parse_cell, polygon_cells};
