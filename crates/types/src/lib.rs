//! # hexdex-types
//!
//! Plain data types shared by the hexdex index and its server:
//!
//! - **Records**: `Record` (base cell + synthetic `level`/`group_id`), `AggregateBucket`
//! - **Configuration values**: `ValueRange`, `LookupStrategy`
//! - **Statistics**: `IndexStats`
//!
//! Cells are `h3o::CellIndex` values and serialize as their hex string form.
//!
//! ## Examples
//!
//! ```rust
//! use hexdex_types::record::Record;
//! use h3o::{LatLng, Resolution};
//!
//! let cell = LatLng::new(56.0, 38.0).unwrap().to_cell(Resolution::Nine);
//! let record = Record::new(cell, -80, 12);
//! assert_eq!(record.cell.resolution(), Resolution::Nine);
//! ```

pub mod config;
pub mod record;
pub mod stats;
