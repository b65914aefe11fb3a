pub mod info;
pub mod process;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;
use crate::config::Config;
use crate::services::error::ApiError;

/// Build all routes for the API
pub fn build_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .merge(info::routes())
        .merge(process::routes(config.rate_limit))
        .fallback(not_found)
}

/// Full application: routes, state and the HTTP middleware stack
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    // The browser frontend is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    build_routes(config)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Current Unix time in fractional seconds
pub(crate) fn epoch_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use axum::extract::ConnectInfo;
    use serde_json::Value;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    use crate::models::VideoMetadata;
    use crate::services::processor::VideoProcessor;
    use crate::services::processor::tests::{StubExtractor, sample_metadata};

    fn app_with(vars: &[(&str, &str)], metadata: Option<VideoMetadata>) -> Router {
        let config = Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        });
        let state = Arc::new(AppState {
            processor: VideoProcessor::new(Arc::new(StubExtractor(metadata))),
        });
        build_router(state, &config)
    }

    /// Rate limiting off: oneshot requests carry no peer address
    fn app(metadata: Option<VideoMetadata>) -> Router {
        app_with(&[("PROCESS_RATE_LIMIT_REPLENISH_SECS", "0")], metadata)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_process(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/process")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_home_lists_endpoints() {
        let (status, body) = send(app(None), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["endpoints"]["/process"], "POST - Process YouTube URL");
        assert_eq!(body["endpoints"]["/health"], "GET - Health check");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(None), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].as_f64().unwrap() > 1_600_000_000.0);
    }

    #[tokio::test]
    async fn test_process_rejects_unsupported_scheme() {
        let (status, body) = send(app(Some(sample_metadata())), post_process(r#"{"url": "ftp://x"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid YouTube URL");
    }

    #[tokio::test]
    async fn test_process_requires_url() {
        for payload in ["", "{}", "not json", r#"{"url": 42}"#, r#"{"link": "https://youtu.be/abc"}"#] {
            let (status, body) = send(app(Some(sample_metadata())), post_process(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Missing URL in request body");
        }
    }

    #[tokio::test]
    async fn test_process_success() {
        let (status, body) = send(
            app(Some(sample_metadata())),
            post_process(r#"{"url": "  https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1  "}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["processed_at"].is_f64());

        let video = &body["video"];
        assert_eq!(video["title"], "Never Gonna Give You Up");
        assert_eq!(video["video_id"], "dQw4w9WgXcQ");
        assert_eq!(
            video["thumbnail"],
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
        assert_eq!(video["duration"], "3m 32s");
        assert_eq!(video["uploader"], "Rick Astley");
        assert_eq!(video["view_count"], 42);
        assert!(video["summary"].as_str().unwrap().starts_with("📹 **Never Gonna Give You Up**"));
    }

    #[tokio::test]
    async fn test_process_extraction_failure() {
        let (status, body) = send(app(None), post_process(r#"{"url": "https://youtu.be/abc123"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to extract video information");
    }

    #[tokio::test]
    async fn test_smoke_endpoint() {
        let mut metadata = sample_metadata();
        metadata.description = "word ".repeat(100);

        let (status, body) = send(app(Some(metadata)), get("/test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["test"], "success");

        let summary = body["sample_data"]["summary"].as_str().unwrap();
        assert_eq!(summary.chars().count(), 203);
        assert!(summary.ends_with("..."));
    }

    #[tokio::test]
    async fn test_smoke_endpoint_failure() {
        let (status, body) = send(app(None), get("/test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["test"], "failed");
        assert_eq!(body["error"], "Could not extract video info");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(app(None), get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_413() {
        let app = app_with(
            &[("PROCESS_RATE_LIMIT_REPLENISH_SECS", "0"), ("MAX_BODY_BYTES", "16")],
            Some(sample_metadata()),
        );
        let (status, body) = send(app, post_process(r#"{"url":"https://youtu.be/abc123"}"#)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Request body too large");
    }

    fn smoke_request(forwarded_for: &str, peer: SocketAddr) -> Request<Body> {
        let mut request = Request::builder()
            .uri("/test")
            .header("x-forwarded-for", forwarded_for)
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        request
    }

    #[tokio::test]
    async fn test_rate_limited_requests_get_json_429() {
        let app = app_with(
            &[
                ("PROCESS_RATE_LIMIT_REPLENISH_SECS", "60"),
                ("PROCESS_RATE_LIMIT_BURST", "1"),
                ("TRUST_PROXY_HEADERS", "true"),
            ],
            Some(sample_metadata()),
        );
        let peer: SocketAddr = "10.0.0.1:4000".parse().unwrap();

        let (status, body) = send(app.clone(), smoke_request("1.2.3.4", peer)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["test"], "success");

        let response = app.clone().oneshot(smoke_request("1.2.3.4", peer)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Too many requests"));

        // A different forwarded client has its own budget when proxy headers are trusted
        let (status, _) = send(app, smoke_request("5.6.7.8", peer)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forwarded_header_ignored_without_trusted_proxy() {
        let app = app_with(
            &[
                ("PROCESS_RATE_LIMIT_REPLENISH_SECS", "60"),
                ("PROCESS_RATE_LIMIT_BURST", "1"),
            ],
            Some(sample_metadata()),
        );
        let peer: SocketAddr = "10.0.0.1:4000".parse().unwrap();

        let (status, _) = send(app.clone(), smoke_request("1.2.3.4", peer)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app, smoke_request("5.6.7.8", peer)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
    }
}
