//! Video processing endpoints (/process, /test)

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
};

use super::epoch_seconds;
use crate::AppState;
use crate::config::RateLimitConfig;
use crate::constants::{TEST_SUMMARY_LIMIT, TEST_VIDEO_URL};
use crate::domain::video_id::is_supported_url;
use crate::models::ProcessedVideo;
use crate::services::error::{ApiError, LogErr};

pub fn routes(rate_limit: Option<RateLimitConfig>) -> Router<Arc<AppState>> {
    let router = Router::new()
        .route("/process", post(process_video))
        .route("/test", get(test_endpoint));

    let Some(limits) = rate_limit else {
        return router;
    };

    // Every request here spawns yt-dlp, so throttle per client IP.
    // Forwarding headers are client-controlled unless a proxy rewrites them.
    let limited = if limits.trust_proxy_headers {
        GovernorConfigBuilder::default()
            .per_second(limits.replenish_secs)
            .burst_size(limits.burst)
            .key_extractor(SmartIpKeyExtractor)
            .error_handler(rate_limit_response)
            .finish()
            .map(|config| router.clone().layer(GovernorLayer { config: config.into() }))
    } else {
        GovernorConfigBuilder::default()
            .per_second(limits.replenish_secs)
            .burst_size(limits.burst)
            .error_handler(rate_limit_response)
            .finish()
            .map(|config| router.clone().layer(GovernorLayer { config: config.into() }))
    };

    limited.unwrap_or_else(|| {
        tracing::warn!(?limits, "Invalid rate limit settings, serving without rate limiting");
        router
    })
}

/// Render governor rejections in the same JSON shape as every other API error
fn rate_limit_response(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = ApiError::RateLimited(wait_time).into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        other => {
            tracing::error!("Rate limiter rejected request: {}", other);
            ApiError::UnidentifiedClient.into_response()
        }
    }
}

#[derive(Deserialize)]
struct ProcessRequest {
    url: String,
}

#[derive(Serialize)]
struct ProcessResponse {
    success: bool,
    video: ProcessedVideo,
    processed_at: f64,
}

/// POST /process - Extract metadata and build a summary for a YouTube URL
async fn process_video(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::MissingUrl
        }
    })?;

    // Empty body, malformed JSON and a missing or non-string `url` are all the same client error
    let request: ProcessRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::MissingUrl)?;

    let url = request.url.trim();
    if !is_supported_url(url) {
        return Err(ApiError::InvalidUrl);
    }

    tracing::info!("Processing URL: {}", url);

    let video = state
        .processor
        .process(url)
        .await
        .log_api("Error extracting video info", ApiError::ExtractionFailed)?;

    tracing::info!("Successfully processed: {}", video.title);

    Ok(Json(ProcessResponse {
        success: true,
        video,
        processed_at: epoch_seconds(),
    }))
}

#[derive(Serialize)]
struct SampleData {
    title: String,
    thumbnail: String,
    summary: String,
}

#[derive(Serialize)]
#[serde(tag = "test", rename_all = "lowercase")]
enum TestResponse {
    Success { sample_data: SampleData },
    Failed { error: String },
}

/// Cap the sample summary so smoke-test output stays short
fn preview(summary: String) -> String {
    if summary.chars().count() > TEST_SUMMARY_LIMIT {
        let mut shortened: String = summary.chars().take(TEST_SUMMARY_LIMIT).collect();
        shortened.push_str("...");
        shortened
    } else {
        summary
    }
}

/// GET /test - Run the pipeline against a fixed sample video
async fn test_endpoint(State(state): State<Arc<AppState>>) -> Json<TestResponse> {
    let info = match state.processor.get_video_info(TEST_VIDEO_URL).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!("Test extraction failed: {}", e);
            return Json(TestResponse::Failed {
                error: "Could not extract video info".to_string(),
            });
        }
    };

    let summary = state.processor.summarize(&info);

    Json(TestResponse::Success {
        sample_data: SampleData {
            title: info.metadata.title,
            thumbnail: info.metadata.thumbnail,
            summary: preview(summary),
        },
    })
}
