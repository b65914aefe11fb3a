//! Shared data models used across modules

use serde::Serialize;

/// Metadata resolved by the extraction tool for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    /// Whole seconds; `None` when the tool did not report a length
    pub duration: Option<u64>,
    pub view_count: u64,
    /// `YYYYMMDD` as reported by the tool, empty when unknown
    pub upload_date: String,
    pub uploader: String,
    pub thumbnail: String,
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            description: String::new(),
            duration: None,
            view_count: 0,
            upload_date: String::new(),
            uploader: "Unknown".to_string(),
            thumbnail: String::new(),
        }
    }
}

/// Extractor metadata plus what we derive from the request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub metadata: VideoMetadata,
    pub video_id: Option<String>,
}

/// Display-ready fields for one processed video
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedVideo {
    pub title: String,
    pub thumbnail: String,
    pub summary: String,
    pub duration: String,
    pub uploader: String,
    pub view_count: u64,
    pub video_id: Option<String>,
}
