//! Application constants

/// Default listen port when `PORT` is unset
pub const DEFAULT_PORT: u16 = 5000;

/// Default yt-dlp timeout in seconds
pub const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Maximum request body size for JSON endpoints (64 KB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Seconds to replenish one rate-limit token on the extraction endpoints
pub const DEFAULT_RATE_LIMIT_REPLENISH_SECS: u64 = 2;

/// Burst capacity on the extraction endpoints
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// Description characters kept in a summary before the ellipsis
pub const SUMMARY_DESCRIPTION_LIMIT: usize = 200;

/// Characters of the summary returned by the smoke-test endpoint
pub const TEST_SUMMARY_LIMIT: usize = 200;

/// Fixed video used by GET /test
pub const TEST_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
