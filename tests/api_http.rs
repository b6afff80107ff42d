// tests/api_http.rs
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt; // for `oneshot`

use africa_ai_news_ingest::api::{create_router, AppState};
use africa_ai_news_ingest::ingest::fetch::HttpFetcher;
use africa_ai_news_ingest::ingest::Ingestor;
use africa_ai_news_ingest::store::MemoryStore;

/// A router over an empty store: no sources, so no network is touched.
fn router(cron_secret: Option<&str>) -> axum::Router {
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(1)));
    let ingestor = Arc::new(Ingestor::new(store, fetcher, 2));
    create_router(AppState {
        ingestor,
        cron_secret: cron_secret.map(str::to_string),
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    // axum::body::to_bytes requires an explicit limit
    let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let response = router(None)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trigger_is_open_without_a_configured_secret() {
    let response = router(None)
        .oneshot(Request::post("/ingest/run").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sources"], serde_json::json!([]));
    assert!(json["ranAt"].is_string());
}

#[tokio::test]
async fn trigger_rejects_a_missing_or_wrong_secret() {
    let missing = router(Some("s3cret"))
        .oneshot(Request::post("/ingest/run").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = router(Some("s3cret"))
        .oneshot(
            Request::post("/ingest/run")
                .header("x-cron-secret", "nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(wrong).await;
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn trigger_accepts_the_configured_secret_on_get_and_post() {
    for method in ["GET", "POST"] {
        let response = router(Some("s3cret"))
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/ingest/run")
                    .header("x-cron-secret", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "method {method}");
    }
}

#[tokio::test]
async fn per_source_trigger_reports_zero_counts_for_unknown_ids() {
    let response = router(None)
        .oneshot(
            Request::post("/ingest/run/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sourceId"], "ghost");
    assert_eq!(json["itemsFound"], 0);
    assert_eq!(json["itemsInserted"], 0);
}
