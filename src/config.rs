//! Process configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EXTRACT_TIMEOUT_SECS, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_REPLENISH_SECS,
};

/// Settings for the yt-dlp subprocess
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Binary name or path (`YTDLP_PATH`)
    pub binary: PathBuf,
    /// Upper bound for one extraction (`YTDLP_TIMEOUT_SECS`)
    pub timeout: Duration,
}

/// Per-IP limits for the endpoints that shell out to yt-dlp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub replenish_secs: u64,
    pub burst: u32,
    /// Key clients by `X-Forwarded-For`/`X-Real-IP`/`Forwarded` instead of the
    /// peer address. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub extractor: ExtractorConfig,
    /// `None` when `PROCESS_RATE_LIMIT_REPLENISH_SECS=0`
    pub rate_limit: Option<RateLimitConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = get("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let max_body_bytes = get("MAX_BODY_BYTES")
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let binary = get("YTDLP_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("yt-dlp"));

        let timeout_secs = get("YTDLP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_EXTRACT_TIMEOUT_SECS);

        let replenish_secs = get("PROCESS_RATE_LIMIT_REPLENISH_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_REPLENISH_SECS);

        let burst = get("PROCESS_RATE_LIMIT_BURST")
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST);

        let trust_proxy_headers = get("TRUST_PROXY_HEADERS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let rate_limit = (replenish_secs > 0).then_some(RateLimitConfig {
            replenish_secs,
            burst,
            trust_proxy_headers,
        });

        Self {
            host,
            port,
            max_body_bytes,
            extractor: ExtractorConfig {
                binary,
                timeout: Duration::from_secs(timeout_secs),
            },
            rate_limit,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
