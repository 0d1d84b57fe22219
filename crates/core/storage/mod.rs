//! Dataset storage for hexdex
//!
//! Records live in memory only and are never mutated after construction.

pub mod record_store;

pub use record_store::{CellLookup, RecordStore};
