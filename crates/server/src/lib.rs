//! hexdex Server
//!
//! HTTP front end for the hexdex in-memory H3 index.
//!
//! # Example
//!
//! ```ignore
//! use hexdex_server::run_server;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! run_server(listener, Arc::new(index), shutdown).await?;
//! ```

pub mod handler;
pub mod protocol;
pub mod transport;

pub use protocol::{BucketRow, DataEnvelope, ErrorBody, HealthResponse, RecordRow, parse_border};

pub use transport::http::{router, run_server};
