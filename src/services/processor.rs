//! Turns a video URL into display-ready fields: metadata from the extractor,
//! an identifier-derived thumbnail, and a generated summary.

use std::sync::Arc;

use crate::domain::{summary, video_id};
use crate::models::{ProcessedVideo, VideoInfo};
use crate::services::extractor::{ExtractError, MetadataExtractor};

#[derive(Clone)]
pub struct VideoProcessor {
    extractor: Arc<dyn MetadataExtractor>,
}

impl VideoProcessor {
    pub fn new(extractor: Arc<dyn MetadataExtractor>) -> Self {
        Self { extractor }
    }

    /// Resolve metadata and attach the video ID. When an ID is found the
    /// max-resolution thumbnail replaces whatever the extractor reported.
    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo, ExtractError> {
        let mut metadata = self.extractor.extract(url).await?;
        let video_id = video_id::extract_video_id(url);

        if let Some(id) = &video_id {
            metadata.thumbnail = video_id::thumbnail_url(id);
        }

        Ok(VideoInfo { metadata, video_id })
    }

    pub fn summarize(&self, info: &VideoInfo) -> String {
        summary::generate_summary(
            &info.metadata.title,
            &info.metadata.description,
            info.metadata.duration,
        )
    }

    pub async fn process(&self, url: &str) -> Result<ProcessedVideo, ExtractError> {
        let info = self.get_video_info(url).await?;
        let summary = self.summarize(&info);
        let VideoInfo { metadata, video_id } = info;

        tracing::debug!(
            title = %metadata.title,
            upload_date = %metadata.upload_date,
            "Extracted video info"
        );

        Ok(ProcessedVideo {
            duration: summary::format_duration(metadata.duration),
            title: metadata.title,
            thumbnail: metadata.thumbnail,
            summary,
            uploader: metadata.uploader,
            view_count: metadata.view_count,
            video_id,
        })
    }
}
