use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use hexdex::{HexIndex, Resolution};
use hexdex_server::{BucketRow, DataEnvelope, ErrorBody, HealthResponse, RecordRow, router};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

fn index() -> Arc<HexIndex> {
    Arc::new(
        HexIndex::builder()
            .base_resolution(9)
            .center(56.0, 38.0)
            .radius_km(7.0)
            .seed(99)
            .build()
            .unwrap(),
    )
}

async fn get(index: Arc<HexIndex>, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router(index)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json<T: DeserializeOwned>(index: Arc<HexIndex>, uri: &str) -> (StatusCode, T) {
    let (status, body) = get(index, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_hex_endpoint() {
    tracing_subscriber::fmt::try_init().ok();
    let index = index();
    let parent = index.center().parent(Resolution::Seven).unwrap();

    let (status, body): (_, DataEnvelope<Vec<RecordRow>>) =
        get_json(index.clone(), &format!("/hex?parent_hex={}", parent)).await;
    assert_eq!(status, StatusCode::OK);

    let expected: Vec<RecordRow> = index
        .children_of(parent)
        .unwrap()
        .iter()
        .map(RecordRow::from)
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(body.data, expected);
}

#[tokio::test]
async fn test_hex_endpoint_bad_cell() {
    let (status, body): (_, ErrorBody) = get_json(index(), "/hex?parent_hex=zzzz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.detail.contains("zzzz"));
}

#[tokio::test]
async fn test_hex_endpoint_missing_param() {
    let (status, body): (_, ErrorBody) = get_json(index(), "/hex").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.detail.contains("parent_hex"));
}

#[tokio::test]
async fn test_bbox_endpoint_swaps_coordinates() {
    let index = index();
    let border = "55.98/37.97,55.98/38.03,56.02/38.03,56.02/37.97";

    let (status, body): (_, DataEnvelope<Vec<RecordRow>>) =
        get_json(index.clone(), &format!("/bbox?border={}", border)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.data.is_empty());

    let polygon = hexdex_server::parse_border(border).unwrap();
    let expected: Vec<RecordRow> = index
        .within(&polygon)
        .unwrap()
        .iter()
        .map(RecordRow::from)
        .collect();
    assert_eq!(body.data, expected);
}

#[tokio::test]
async fn test_bbox_endpoint_rejects_short_border() {
    let (status, body): (_, ErrorBody) = get_json(index(), "/bbox?border=56.0/38.0,56.1/38.1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.detail.contains("at least 3"));

    let (status, _): (_, ErrorBody) = get_json(index(), "/bbox?border=a/b,1/2,3/4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_avg_endpoint() {
    let index = index();
    let (status, body): (_, DataEnvelope<Vec<BucketRow>>) =
        get_json(index.clone(), "/avg?resolution=6").await;
    assert_eq!(status, StatusCode::OK);

    let expected: Vec<BucketRow> = index
        .aggregate(Resolution::Six)
        .unwrap()
        .iter()
        .map(BucketRow::from)
        .collect();
    assert_eq!(body.data, expected);
}

#[tokio::test]
async fn test_avg_endpoint_rejects_bad_resolution() {
    let (status, _): (_, ErrorBody) = get_json(index(), "/avg?resolution=12").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _): (_, ErrorBody) = get_json(index(), "/avg?resolution=16").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_avg_endpoint_rejects_malformed_query() {
    let (status, body): (_, ErrorBody) = get_json(index(), "/avg?resolution=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.detail.is_empty());

    let (status, _): (_, ErrorBody) = get_json(index(), "/avg?resolution=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoint() {
    let index = index();
    let (status, body): (_, HealthResponse) = get_json(index.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.status, "ok");
    assert_eq!(body.records, index.len());
    assert_eq!(body.base_resolution, 9);
}

#[tokio::test]
async fn test_run_server_shuts_down() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(hexdex_server::run_server(listener, index(), async move {
        rx.await.ok();
    }));

    tx.send(()).ok();
    tokio::time::timeout(std::time::Duration::from_secs(5), server).await???;
    Ok(())
}
