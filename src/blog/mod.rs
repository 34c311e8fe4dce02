//! Blog generation
//!
//! Ties the extractor, transcript source, prompt builder and LLM provider
//! into one request, and persists the result as a Markdown artifact.

pub mod export;
mod pipeline;

use std::fmt;

use crate::video::{self, VideoId};
use crate::Result;

pub use export::{download, Artifact, Exporter, MARKDOWN_MIME};
pub use pipeline::{BlogOutcome, BlogPipeline, Stage};

pub const MIN_WORD_COUNT: u32 = 100;
pub const MAX_WORD_COUNT: u32 = 500;
pub const WORD_COUNT_STEP: u32 = 50;
pub const DEFAULT_WORD_COUNT: u32 = 200;

/// What the user asked for: a video URL and a target length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRequest {
    pub url: String,
    pub word_count: u32,
}

impl BlogRequest {
    pub fn new(url: impl Into<String>, word_count: u32) -> Self {
        Self {
            url: url.into(),
            word_count,
        }
    }

    /// Extract the video id; no network access.
    pub fn video(&self) -> Result<VideoId> {
        video::extract(&self.url)
    }
}

/// Model output, treated as opaque Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost(String);

impl GeneratedPost {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Display for GeneratedPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a word count against the selector range (100..=500, step 50).
pub fn validate_word_count(count: u32) -> std::result::Result<u32, String> {
    if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&count) {
        return Err(format!(
            "word count must be between {} and {}",
            MIN_WORD_COUNT, MAX_WORD_COUNT
        ));
    }
    if count % WORD_COUNT_STEP != 0 {
        return Err(format!("word count must be a multiple of {}", WORD_COUNT_STEP));
    }
    Ok(count)
}

/// Next selectable word count, saturating at the maximum.
pub fn next_word_count(count: u32) -> u32 {
    snap_word_count(count.saturating_add(WORD_COUNT_STEP))
}

/// Previous selectable word count, saturating at the minimum.
pub fn previous_word_count(count: u32) -> u32 {
    snap_word_count(count.saturating_sub(WORD_COUNT_STEP))
}

/// Clamp into range and round down onto the step grid.
pub fn snap_word_count(count: u32) -> u32 {
    let clamped = count.clamp(MIN_WORD_COUNT, MAX_WORD_COUNT);
    clamped - (clamped - MIN_WORD_COUNT) % WORD_COUNT_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_range_and_step() {
        assert_eq!(validate_word_count(100), Ok(100));
        assert_eq!(validate_word_count(350), Ok(350));
        assert_eq!(validate_word_count(500), Ok(500));
        assert!(validate_word_count(50).is_err());
        assert!(validate_word_count(550).is_err());
        assert!(validate_word_count(225).is_err());
    }

    #[test]
    fn stepping_stays_on_grid() {
        assert_eq!(next_word_count(200), 250);
        assert_eq!(next_word_count(500), 500);
        assert_eq!(previous_word_count(200), 150);
        assert_eq!(previous_word_count(100), 100);
        assert_eq!(snap_word_count(0), 100);
        assert_eq!(snap_word_count(9000), 500);
        assert_eq!(snap_word_count(230), 200);
    }

    #[test]
    fn request_extracts_video_without_network() {
        let request = BlogRequest::new("https://www.youtube.com/watch?v=abcdefghijk", 300);
        assert_eq!(request.video().unwrap().as_str(), "abcdefghijk");
        assert!(BlogRequest::new("not-a-url", 300).video().is_err());
    }
}
