//! HTTP transport for hexdex server
//!
//! # Endpoints
//! - `GET /hex?parent_hex=<cell>`      - records under a parent cell
//! - `GET /bbox?border=<lat>/<lon>,...` - records inside a polygon
//! - `GET /avg?resolution=<0-15>`      - median level per ancestor and group
//! - `GET /health`                     - index statistics

use crate::handler::{self, SharedIndex};
use axum::Router;
use axum::routing::get;
use tracing::info;

/// Router with every endpoint bound to `index`.
pub fn router(index: SharedIndex) -> Router {
    Router::new()
        .route("/hex", get(handler::children))
        .route("/bbox", get(handler::within))
        .route("/avg", get(handler::aggregate))
        .route("/health", get(handler::health))
        .with_state(index)
}

/// Serve the HTTP API until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the listener fails.
pub async fn run_server(
    listener: tokio::net::TcpListener,
    index: SharedIndex,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!(
        "hexdex HTTP server listening on {} ({} records)",
        listener.local_addr()?,
        index.len()
    );

    axum::serve(listener, router(index))
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown signal received, stopping server...");
        })
        .await?;

    Ok(())
}
