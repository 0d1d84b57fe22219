//! HTTP handlers over a shared [`HexIndex`]

use crate::protocol::{
    BorderParams, BucketRow, DataEnvelope, ErrorBody, HealthResponse, ParentHexParams,
    RecordRow, ResolutionParams, parse_border,
};
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hexdex::validation::validate_resolution;
use hexdex::{HexIndex, HexdexError, Record};
use std::sync::Arc;
use tracing::{error, warn};

pub type SharedIndex = Arc<HexIndex>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Index(#[from] HexdexError),

    #[error("{0}")]
    Query(#[from] QueryRejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Index(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Index(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<DataEnvelope<T>>, ApiError>;

/// Runs a query on the blocking pool; queries walk the whole dataset and
/// must not stall the async workers.
async fn run_query<T, F>(index: SharedIndex, query: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&HexIndex) -> hexdex::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || query(&index))
        .await
        .map_err(|e| {
            error!("Query task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}

/// Unwraps query parameters, turning a malformed query string into a JSON
/// error body instead of axum's plain-text rejection.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    let Query(params) = query.inspect_err(|e| warn!("Rejected query string: {}", e))?;
    Ok(params)
}

fn record_rows(records: &[Record]) -> Vec<RecordRow> {
    records.iter().map(RecordRow::from).collect()
}

/// `GET /hex?parent_hex=<cell>`
pub async fn children(
    State(index): State<SharedIndex>,
    query: Result<Query<ParentHexParams>, QueryRejection>,
) -> ApiResult<Vec<RecordRow>> {
    let parent = query_params(query)?.parent_hex;
    let query_parent = parent.clone();
    let records = run_query(index, move |index| index.children_of_str(&query_parent))
        .await
        .inspect_err(|e| warn!("children query for {:?} failed: {}", parent, e))?;

    Ok(Json(DataEnvelope::new(record_rows(&records))))
}

/// `GET /bbox?border=<lat>/<lon>,...`
pub async fn within(
    State(index): State<SharedIndex>,
    query: Result<Query<BorderParams>, QueryRejection>,
) -> ApiResult<Vec<RecordRow>> {
    let border = query_params(query)?.border;
    let polygon = parse_border(&border)
        .inspect_err(|e| warn!("Rejected border {:?}: {}", border, e))?;

    let records = run_query(index, move |index| index.within(&polygon))
        .await
        .inspect_err(|e| warn!("within query for {:?} failed: {}", border, e))?;

    Ok(Json(DataEnvelope::new(record_rows(&records))))
}

/// `GET /avg?resolution=<0-15>`
pub async fn aggregate(
    State(index): State<SharedIndex>,
    query: Result<Query<ResolutionParams>, QueryRejection>,
) -> ApiResult<Vec<BucketRow>> {
    let params = query_params(query)?;
    let resolution = validate_resolution(params.resolution)
        .inspect_err(|e| warn!("Rejected resolution {}: {}", params.resolution, e))?;

    let buckets = run_query(index, move |index| index.aggregate(resolution))
        .await
        .inspect_err(|e| warn!("aggregate at {} failed: {}", params.resolution, e))?;

    Ok(Json(DataEnvelope::new(
        buckets.iter().map(BucketRow::from).collect(),
    )))
}

/// `GET /health`
pub async fn health(State(index): State<SharedIndex>) -> Json<HealthResponse> {
    Json(HealthResponse::from(index.stats()))
}
