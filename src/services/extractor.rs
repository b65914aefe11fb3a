//! Video metadata extraction through yt-dlp
//!
//! yt-dlp is run once per request with `--dump-single-json`; nothing is
//! downloaded. The JSON it prints is mapped onto [`VideoMetadata`].

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::config::ExtractorConfig;
use crate::models::VideoMetadata;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("yt-dlp timed out after {0} seconds")]
    Timeout(u64),

    #[error("yt-dlp returned no metadata")]
    Empty,

    #[error("failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves metadata for a video URL. Any error means no metadata at all.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<VideoMetadata, ExtractError>;
}

/// Subset of the yt-dlp info dict we read. Missing and null fields are both `None`.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    description: Option<String>,
    /// Integer for YouTube, fractional for some other extractors
    duration: Option<f64>,
    view_count: Option<u64>,
    upload_date: Option<String>,
    uploader: Option<String>,
    thumbnail: Option<String>,
}

impl From<YtDlpInfo> for VideoMetadata {
    fn from(info: YtDlpInfo) -> Self {
        let defaults = VideoMetadata::default();
        Self {
            title: info.title.unwrap_or(defaults.title),
            description: info.description.unwrap_or(defaults.description),
            duration: info
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d as u64),
            view_count: info.view_count.unwrap_or(defaults.view_count),
            upload_date: info.upload_date.unwrap_or(defaults.upload_date),
            uploader: info.uploader.unwrap_or(defaults.uploader),
            thumbnail: info.thumbnail.unwrap_or(defaults.thumbnail),
        }
    }
}

/// Parse the single JSON document yt-dlp prints on stdout
pub fn parse_info_json(stdout: &[u8]) -> Result<VideoMetadata, ExtractError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Err(ExtractError::Empty);
    }

    let info: YtDlpInfo = serde_json::from_str(text)?;
    Ok(info.into())
}

pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn command(&self, url: &str) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.args(["--dump-single-json", "--no-warnings", "--quiet"])
            .args(["--skip-download", "--no-playlist"])
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl MetadataExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str) -> Result<VideoMetadata, ExtractError> {
        let timeout = self.config.timeout;
        let output = tokio::time::timeout(timeout, self.command(url).output())
            .await
            .map_err(|_| ExtractError::Timeout(timeout.as_secs()))?
            .map_err(|source| ExtractError::Spawn {
                binary: self.config.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ExtractError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        parse_info_json(&output.stdout)
    }
}
