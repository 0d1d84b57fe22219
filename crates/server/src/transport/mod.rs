//! Transport layer for hexdex server
//!
//! Available transports:
//! - `http` - axum HTTP/JSON API
pub mod http;
