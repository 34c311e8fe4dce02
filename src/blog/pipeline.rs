//! Blog generation pipeline orchestration

use anyhow::Result as AnyResult;

use crate::blog::export::{Artifact, Exporter};
use crate::blog::GeneratedPost;
use crate::config::Settings;
use crate::llm::{build_blog_prompt, build_provider, LlmProvider};
use crate::transcript::{self, Transcript, TranscriptSource, YoutubeTranscriptClient};
use crate::video::VideoId;
use crate::{BlogError, Result};

/// Step currently running, for progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingTranscript,
    WritingPost,
    SavingPost,
}

impl Stage {
    pub fn message(&self) -> &'static str {
        match self {
            Stage::FetchingTranscript => "Fetching video transcript...",
            Stage::WritingPost => "Writing blog post...",
            Stage::SavingPost => "Saving blog post...",
        }
    }
}

/// Result of a request that reached the completion service successfully.
///
/// `export` may still have failed; the post is valid either way.
#[derive(Debug)]
pub struct BlogOutcome {
    pub video: VideoId,
    pub transcript: Transcript,
    pub post: GeneratedPost,
    pub export: Result<Artifact>,
}

/// Transcript source, LLM provider and exporter for one process.
pub struct BlogPipeline {
    transcripts: Box<dyn TranscriptSource>,
    llm: Box<dyn LlmProvider>,
    exporter: Exporter,
}

impl BlogPipeline {
    /// Create a pipeline talking to YouTube and the configured LLM provider
    pub fn new(settings: &Settings) -> AnyResult<Self> {
        Ok(Self::with_parts(
            Box::new(YoutubeTranscriptClient::from_settings(settings)?),
            build_provider(settings)?,
            Exporter::from_settings(settings),
        ))
    }

    pub fn with_parts(
        transcripts: Box<dyn TranscriptSource>,
        llm: Box<dyn LlmProvider>,
        exporter: Exporter,
    ) -> Self {
        Self {
            transcripts,
            llm,
            exporter,
        }
    }

    /// Fetch, write and save a post for `video`.
    ///
    /// The transcript and completion calls run once each, in order. Only an
    /// export failure lets the call return `Ok`, carried in `BlogOutcome::export`.
    pub async fn run(
        &self,
        video: &VideoId,
        word_count: u32,
        progress: &(dyn Fn(Stage) + Send + Sync),
    ) -> Result<BlogOutcome> {
        progress(Stage::FetchingTranscript);
        let transcript = transcript::fetch(self.transcripts.as_ref(), video).await?;

        progress(Stage::WritingPost);
        let prompt = build_blog_prompt(transcript.as_str(), word_count);
        tracing::info!(
            "Requesting ~{} word post from {} ({})",
            word_count,
            self.llm.name(),
            self.llm.model()
        );
        let text = self
            .llm
            .complete(&prompt)
            .await
            .map_err(BlogError::CompletionFailed)?;
        let post = GeneratedPost::new(text);

        progress(Stage::SavingPost);
        let export = self.exporter.write(&post);
        if let Err(e) = &export {
            tracing::warn!("{}", e);
        }

        Ok(BlogOutcome {
            video: video.clone(),
            transcript,
            post,
            export,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::{BlogRequest, MARKDOWN_MIME};
    use crate::transcript::TranscriptFragment;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Default)]
    struct Calls {
        transcript_ids: Vec<String>,
        prompts: Vec<String>,
    }

    struct FakeTranscripts {
        calls: Arc<Mutex<Calls>>,
        fail_with_no_captions: bool,
    }

    #[async_trait]
    impl TranscriptSource for FakeTranscripts {
        async fn fetch_fragments(&self, video: &VideoId) -> Result<Vec<TranscriptFragment>> {
            self.calls
                .lock()
                .unwrap()
                .transcript_ids
                .push(video.to_string());
            if self.fail_with_no_captions {
                return Err(BlogError::NoTranscriptAvailable(video.to_string()));
            }
            Ok(vec![
                TranscriptFragment::new("Rust makes", 0.0, 1.2),
                TranscriptFragment::new("systems programming", 1.2, 1.8),
                TranscriptFragment::new("approachable", 3.0, 1.0),
            ])
        }
    }

    struct FakeLlm {
        calls: Arc<Mutex<Calls>>,
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl LlmProvider for FakeLlm {
        async fn complete(&self, prompt: &str) -> AnyResult<String> {
            self.calls.lock().unwrap().prompts.push(prompt.to_string());
            self.reply.clone().map_err(|e| anyhow::anyhow!(e))
        }

        fn name(&self) -> &'static str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    fn pipeline(
        calls: &Arc<Mutex<Calls>>,
        no_captions: bool,
        reply: std::result::Result<String, String>,
        exporter: Exporter,
    ) -> BlogPipeline {
        BlogPipeline::with_parts(
            Box::new(FakeTranscripts {
                calls: Arc::clone(calls),
                fail_with_no_captions: no_captions,
            }),
            Box::new(FakeLlm {
                calls: Arc::clone(calls),
                reply,
            }),
            exporter,
        )
    }

    fn no_progress(_: Stage) {}

    #[test]
    fn generates_and_saves_post_end_to_end() {
        let tmp = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(Calls::default()));
        let post_text = "## Introduction\n\nRust is approachable.";
        let pipeline = pipeline(
            &calls,
            false,
            Ok(post_text.to_string()),
            Exporter::new(tmp.path(), "youtube_blog_post.md"),
        );

        let request = BlogRequest::new("https://www.youtube.com/watch?v=abcdefghijk", 300);
        let video = request.video().unwrap();
        assert_eq!(video.as_str(), "abcdefghijk");

        let stages = Mutex::new(Vec::new());
        let record = |stage: Stage| stages.lock().unwrap().push(stage);
        let outcome =
            tokio_test::block_on(pipeline.run(&video, request.word_count, &record)).unwrap();

        assert_eq!(
            outcome.transcript.as_str(),
            "Rust makes systems programming approachable"
        );
        assert_eq!(outcome.post.as_str(), post_text);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.transcript_ids, vec!["abcdefghijk".to_string()]);
        assert_eq!(calls.prompts.len(), 1);
        assert!(calls.prompts[0].contains("300"));
        assert!(calls.prompts[0].contains("Rust makes systems programming approachable"));

        let artifact = outcome.export.unwrap();
        assert_eq!(artifact.mime, MARKDOWN_MIME);
        assert_eq!(std::fs::read_to_string(&artifact.path).unwrap(), post_text);

        assert_eq!(
            *stages.lock().unwrap(),
            vec![Stage::FetchingTranscript, Stage::WritingPost, Stage::SavingPost]
        );
    }

    #[test]
    fn missing_captions_skip_completion_and_keep_old_artifact() {
        let tmp = tempdir().unwrap();
        let exporter = Exporter::new(tmp.path(), "youtube_blog_post.md");
        exporter.write(&GeneratedPost::new("previous post")).unwrap();

        let calls = Arc::new(Mutex::new(Calls::default()));
        let pipeline = pipeline(&calls, true, Ok("new post".to_string()), exporter);
        let video = crate::video::extract("https://youtu.be/abcdefghijk").unwrap();

        let err = tokio_test::block_on(pipeline.run(&video, 200, &no_progress)).unwrap_err();

        assert!(matches!(err, BlogError::NoTranscriptAvailable(_)));
        assert!(calls.lock().unwrap().prompts.is_empty());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("youtube_blog_post.md")).unwrap(),
            "previous post"
        );
    }

    #[test]
    fn completion_failure_is_typed_and_writes_nothing() {
        let tmp = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(Calls::default()));
        let pipeline = pipeline(
            &calls,
            false,
            Err("401 Unauthorized".to_string()),
            Exporter::new(tmp.path(), "youtube_blog_post.md"),
        );
        let video = crate::video::extract("https://youtu.be/abcdefghijk").unwrap();

        let err = tokio_test::block_on(pipeline.run(&video, 200, &no_progress)).unwrap_err();

        assert!(matches!(err, BlogError::CompletionFailed(_)));
        assert!(err.to_string().contains("401 Unauthorized"));
        assert!(!tmp.path().join("youtube_blog_post.md").exists());
    }

    #[test]
    fn export_failure_keeps_generated_post() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let calls = Arc::new(Mutex::new(Calls::default()));
        let pipeline = pipeline(
            &calls,
            false,
            Ok("still here".to_string()),
            Exporter::new(&blocker, "youtube_blog_post.md"),
        );
        let video = crate::video::extract("https://youtu.be/abcdefghijk").unwrap();

        let outcome = tokio_test::block_on(pipeline.run(&video, 200, &no_progress)).unwrap();

        assert_eq!(outcome.post.as_str(), "still here");
        assert!(matches!(outcome.export, Err(BlogError::ExportFailed(_))));
    }
}
