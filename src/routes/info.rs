//! Service information endpoints (/, /health)

use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::epoch_seconds;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
}

#[derive(Serialize)]
struct HomeResponse {
    message: &'static str,
    status: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
}

/// GET / - API description and endpoint list
async fn home() -> Json<HomeResponse> {
    let endpoints = BTreeMap::from([
        ("/health", "GET - Health check"),
        ("/process", "POST - Process YouTube URL"),
        ("/test", "GET - Test with sample video"),
    ]);

    Json(HomeResponse {
        message: "YouTube Video Processor API",
        status: "running",
        endpoints,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: f64,
}

/// GET /health - Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: epoch_seconds(),
    })
}
