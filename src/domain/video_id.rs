//! YouTube URL validation and video identifier extraction

use regex::Regex;
use std::sync::LazyLock;

/// Identifier patterns, tried in order. The first capture group is the ID.
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
            .expect("Failed to compile watch/short/embed pattern"),
        Regex::new(r"youtube\.com/v/([^&\n?#]+)").expect("Failed to compile /v/ pattern"),
    ]
});

static SUPPORTED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?(youtube\.com|youtu\.be)")
        .expect("Failed to compile supported URL pattern")
});

/// Extract the video ID from watch, short-host, embed or `/v/` URLs.
///
/// The ID is the text after the matched prefix up to the next `&`, newline,
/// `?` or `#`, returned verbatim. `None` means no pattern matched.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
    })
}

/// Whether the URL points at youtube.com or youtu.be over http(s)
pub fn is_supported_url(url: &str) -> bool {
    SUPPORTED_URL.is_match(url)
}

/// Highest-resolution static thumbnail for a video ID
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}
