mod config;
mod constants;
mod domain;
mod models;
mod routes;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::Config;
use services::extractor::YtDlpExtractor;
use services::processor::VideoProcessor;

#[derive(Clone)]
pub struct AppState {
    pub processor: VideoProcessor,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ytsum=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let extractor = YtDlpExtractor::new(config.extractor.clone());
    let state = Arc::new(AppState {
        processor: VideoProcessor::new(Arc::new(extractor)),
    });

    let app = routes::build_router(state, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Starting YouTube Video Processor API");
    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        binary = %config.extractor.binary.display(),
        timeout_secs = config.extractor.timeout.as_secs(),
        "Using yt-dlp for metadata extraction"
    );
    match config.rate_limit {
        Some(limits) => tracing::info!(
            replenish_secs = limits.replenish_secs,
            burst = limits.burst,
            trust_proxy_headers = limits.trust_proxy_headers,
            "Rate limiting /process and /test per client IP"
        ),
        None => tracing::info!("Rate limiting disabled"),
    }
    tracing::info!("Endpoints: GET /, GET /health, POST /process, GET /test");

    // Connect info lets the rate limiter fall back to the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
