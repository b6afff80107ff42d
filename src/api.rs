// src/api.rs
//! HTTP trigger surface. The scheduled trigger calls `/ingest/run` with a
//! shared-secret header and relays the JSON report; everything heavier
//! (moderation, source admin) lives in external collaborators.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::ingest::Ingestor;

const CRON_SECRET_HEADER: &str = "x-cron-secret";

#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
    pub cron_secret: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ingest/run", post(run_all).get(run_all))
        .route("/ingest/run/{source_id}", post(run_source))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// With no secret configured the trigger is open, matching a trusted
/// scheduler sitting in front.
fn authorized(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(secret) = &state.cron_secret else {
        return true;
    };
    headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some(secret.as_str())
}

async fn run_all(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    match state.ingestor.run_all().await {
        Ok(report) => Json(report).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn run_source(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    match state.ingestor.run_source(&source_id).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => internal_error(err),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(target: "ingest", error = %err, "ingestion trigger failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}
