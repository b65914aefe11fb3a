//! Human-readable video summaries built from extractor metadata.
//!
//! Everything here is pure: the same title, description and duration always
//! produce the same text. Summary generation is total; internal faults are
//! rendered into the summary string instead of being returned.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::constants::SUMMARY_DESCRIPTION_LIMIT;

/// Literal http(s) URLs, including percent-escapes. `[$-_]` is a range and
/// covers most ASCII punctuation.
static URL_LITERAL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\\(),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
});

static NEWLINE_RUN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"\n+"));

pub const UNKNOWN_DURATION: &str = "Unknown duration";
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn pattern(lazy: &'static LazyLock<Result<Regex, regex::Error>>) -> Result<&'static Regex, SummaryError> {
    LazyLock::force(lazy)
        .as_ref()
        .map_err(|e| SummaryError::Pattern(e.clone()))
}

/// Format a duration in seconds as `1h 2m 5s`, `2m 5s` or `45s`.
///
/// Zero is reported as unknown, the same as a missing duration.
pub fn format_duration(seconds: Option<u64>) -> String {
    let total = match seconds {
        Some(s) if s > 0 => s,
        _ => return UNKNOWN_DURATION.to_string(),
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Unicode whitespace plus the ASCII file, group, record and unit separators
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Strip URLs, fold newline runs into a single space and trim.
pub fn clean_description(description: &str) -> Result<String, SummaryError> {
    let without_urls = pattern(&URL_LITERAL)?.replace_all(description, "");
    let single_line = pattern(&NEWLINE_RUN)?.replace_all(&without_urls, " ");
    Ok(single_line.trim_matches(is_strippable).to_string())
}

/// Cap a cleaned description at the summary limit, or fall back to the
/// placeholder when nothing is left.
fn shorten(cleaned: String) -> String {
    if cleaned.chars().count() > SUMMARY_DESCRIPTION_LIMIT {
        let mut truncated: String = cleaned.chars().take(SUMMARY_DESCRIPTION_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else if cleaned.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        cleaned
    }
}

pub fn try_generate_summary(
    title: &str,
    description: &str,
    duration: Option<u64>,
) -> Result<String, SummaryError> {
    let text = shorten(clean_description(description)?);
    let duration = format_duration(duration);

    Ok(format!(
        "📹 **{}**\n\n⏱️ Duration: {}\n\n📝 Description: {}",
        title, duration, text
    ))
}

/// Build the three-line summary. Never fails; faults become
/// `Unable to generate summary: ...`.
pub fn generate_summary(title: &str, description: &str, duration: Option<u64>) -> String {
    try_generate_summary(title, description, duration).unwrap_or_else(|e| fallback(&e))
}

fn fallback(err: &SummaryError) -> String {
    tracing::warn!(error = %err, "summary generation failed");
    format!("Unable to generate summary: {}", err)
}
