//! vid2blog - turn a YouTube video's transcript into a blog post
//!
//! The flow is linear: extract the video id, fetch the transcript, build a
//! prompt, ask a completion service for the post, then show and save it.

pub mod blog;
pub mod cli;
pub mod config;
pub mod llm;
pub mod transcript;
pub mod tui;
pub mod video;

use thiserror::Error;

/// Error kinds surfaced by a blog request.
///
/// Every variant ends the current request; none of them is retried.
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Invalid YouTube URL format: {0}")]
    InvalidUrlFormat(String),

    #[error("No transcript available for video {0}")]
    NoTranscriptAvailable(String),

    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("Transcript fetch failed: {0:#}")]
    TranscriptFetchFailed(#[source] anyhow::Error),

    #[error("Completion request failed: {0:#}")]
    CompletionFailed(#[source] anyhow::Error),

    #[error("Export failed: {0:#}")]
    ExportFailed(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BlogError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "vid2blog";
