//! Transcript retrieval
//!
//! A [`TranscriptSource`] returns the timed caption fragments of a video;
//! [`fetch`] turns them into the single text blob the prompt is built from.

pub mod youtube;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::video::VideoId;
use crate::{BlogError, Result};

pub use youtube::YoutubeTranscriptClient;

/// One caption span. Only `text` feeds the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Fragment texts joined with single spaces, in fragment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    /// Join fragments without trimming, deduplicating or re-segmenting.
    pub fn from_fragments(fragments: &[TranscriptFragment]) -> Self {
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rough word count, used for status output.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External service that knows the captions of a video.
///
/// Implementations map their failures onto `NoTranscriptAvailable`,
/// `VideoUnavailable` or `TranscriptFetchFailed`.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_fragments(&self, video: &VideoId) -> Result<Vec<TranscriptFragment>>;
}

/// Fetch the transcript of `video` with a single call to `source`.
pub async fn fetch(source: &dyn TranscriptSource, video: &VideoId) -> Result<Transcript> {
    tracing::info!("Fetching transcript for video {}", video);

    let fragments = source.fetch_fragments(video).await?;
    if fragments.is_empty() {
        return Err(BlogError::NoTranscriptAvailable(video.to_string()));
    }

    let transcript = Transcript::from_fragments(&fragments);
    tracing::info!(
        "Transcript ready: {} fragments, {} words",
        fragments.len(),
        transcript.word_count()
    );

    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Fragments(Vec<TranscriptFragment>),
        NoCaptions,
        Unavailable,
        Broken,
    }

    struct FakeSource {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscriptSource for FakeSource {
        async fn fetch_fragments(&self, video: &VideoId) -> Result<Vec<TranscriptFragment>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Fragments(f) => Ok(f.clone()),
                Reply::NoCaptions => Err(BlogError::NoTranscriptAvailable(video.to_string())),
                Reply::Unavailable => Err(BlogError::VideoUnavailable(video.to_string())),
                Reply::Broken => Err(BlogError::TranscriptFetchFailed(anyhow::anyhow!(
                    "connection reset"
                ))),
            }
        }
    }

    fn video_id() -> VideoId {
        video::extract("https://youtu.be/abcdefghijk").unwrap()
    }

    #[test]
    fn joins_fragments_with_single_spaces_in_order() {
        let source = FakeSource::new(Reply::Fragments(vec![
            TranscriptFragment::new("Hello", 0.0, 1.0),
            TranscriptFragment::new("world", 1.0, 1.0),
        ]));

        let transcript = tokio_test::block_on(fetch(&source, &video_id())).unwrap();
        assert_eq!(transcript.as_str(), "Hello world");
    }

    #[test]
    fn join_keeps_fragment_text_untouched() {
        let fragments = vec![
            TranscriptFragment::new(" padded ", 0.0, 1.0),
            TranscriptFragment::new("again", 1.0, 1.0),
            TranscriptFragment::new("again", 2.0, 1.0),
        ];
        let transcript = Transcript::from_fragments(&fragments);
        assert_eq!(transcript.as_str(), " padded  again again");
    }

    #[test]
    fn no_captions_surfaces_no_transcript_available() {
        let source = FakeSource::new(Reply::NoCaptions);
        let err = tokio_test::block_on(fetch(&source, &video_id())).unwrap_err();
        assert!(matches!(err, BlogError::NoTranscriptAvailable(ref id) if id == "abcdefghijk"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_fragment_list_is_no_transcript() {
        let source = FakeSource::new(Reply::Fragments(Vec::new()));
        let err = tokio_test::block_on(fetch(&source, &video_id())).unwrap_err();
        assert!(matches!(err, BlogError::NoTranscriptAvailable(_)));
    }

    #[test]
    fn other_failures_keep_their_kind_and_are_not_retried() {
        let source = FakeSource::new(Reply::Unavailable);
        let err = tokio_test::block_on(fetch(&source, &video_id())).unwrap_err();
        assert!(matches!(err, BlogError::VideoUnavailable(_)));

        let source = FakeSource::new(Reply::Broken);
        let err = tokio_test::block_on(fetch(&source, &video_id())).unwrap_err();
        assert!(matches!(err, BlogError::TranscriptFetchFailed(_)));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
