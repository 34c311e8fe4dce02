//! YouTube caption client
//!
//! Reads the player response embedded in the watch page, picks a caption
//! track for the preferred languages and downloads it in the `json3`
//! timed-text format.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::config::Settings;
use crate::transcript::{TranscriptFragment, TranscriptSource};
use crate::video::VideoId;
use crate::{BlogError, Result};

const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";
const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";

pub struct YoutubeTranscriptClient {
    http: Client,
    languages: Vec<String>,
}

impl YoutubeTranscriptClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let languages: Vec<String> = settings
            .transcript
            .languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(settings.transcript.timeout_secs))
                .build()
                .context("Failed to build transcript HTTP client")?,
            languages: if languages.is_empty() {
                vec!["en".to_string()]
            } else {
                languages
            },
        })
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(COOKIE, "CONSENT=YES+1")
            .send()
            .await
            .with_context(|| format!("{} request failed", what))
            .map_err(BlogError::TranscriptFetchFailed)?;

        let response = response
            .error_for_status()
            .with_context(|| format!("{} returned an error status", what))
            .map_err(BlogError::TranscriptFetchFailed)?;

        response
            .text()
            .await
            .with_context(|| format!("Failed to read {} body", what))
            .map_err(BlogError::TranscriptFetchFailed)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptClient {
    async fn fetch_fragments(&self, video: &VideoId) -> Result<Vec<TranscriptFragment>> {
        let html = self.get_text(&video.watch_url(), "Watch page").await?;

        if html.contains(RECAPTCHA_MARKER) {
            return Err(BlogError::TranscriptFetchFailed(anyhow::anyhow!(
                "YouTube is rate limiting requests from this IP (too many requests)"
            )));
        }

        let player = extract_player_response(&html)?;
        player.ensure_playable(video)?;

        let tracks = player.caption_tracks();
        if tracks.is_empty() {
            tracing::info!("Captions are disabled for video {}", video);
            return Err(BlogError::NoTranscriptAvailable(video.to_string()));
        }

        let track = select_track(tracks, &self.languages).ok_or_else(|| {
            tracing::info!(
                "No caption track for {} in languages {:?} (available: {:?})",
                video,
                self.languages,
                tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>()
            );
            BlogError::NoTranscriptAvailable(video.to_string())
        })?;

        tracing::debug!(
            "Using {} caption track '{}'",
            if track.is_generated() { "generated" } else { "manual" },
            track.language_code
        );

        let url = timedtext_url(&track.base_url).map_err(BlogError::TranscriptFetchFailed)?;
        let body = self.get_text(url.as_str(), "Caption track").await?;

        parse_json3(&body).map_err(BlogError::TranscriptFetchFailed)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

impl PlayerResponse {
    fn ensure_playable(&self, video: &VideoId) -> Result<()> {
        match &self.playability_status {
            Some(status) if status.status != "OK" => {
                tracing::info!(
                    "Video {} is not playable: {} ({})",
                    video,
                    status.status,
                    status.reason.as_deref().unwrap_or("no reason given")
                );
                Err(BlogError::VideoUnavailable(video.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn caption_tracks(&self) -> &[CaptionTrack] {
        self.captions
            .as_ref()
            .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
            .map(|r| r.caption_tracks.as_slice())
            .unwrap_or(&[])
    }
}

/// Pull the `ytInitialPlayerResponse` object out of a watch page.
fn extract_player_response(html: &str) -> Result<PlayerResponse> {
    let start = html
        .match_indices(PLAYER_RESPONSE_MARKER)
        .find_map(|(idx, marker)| {
            let rest = html[idx + marker.len()..].trim_start();
            let rest = rest.strip_prefix('=')?.trim_start();
            rest.starts_with('{').then(|| html.len() - rest.len())
        })
        .ok_or_else(|| {
            BlogError::TranscriptFetchFailed(anyhow::anyhow!(
                "Watch page did not contain a player response"
            ))
        })?;

    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<PlayerResponse>()
        .next()
        .context("Player response was empty")
        .and_then(|parsed| parsed.context("Failed to parse player response"))
        .map_err(BlogError::TranscriptFetchFailed)
}

/// Manual tracks win over generated ones for the same language; earlier
/// languages win over later ones.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let matching = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(lang);
        tracks
            .iter()
            .filter(matching)
            .find(|t| !t.is_generated())
            .or_else(|| tracks.iter().filter(matching).find(|t| t.is_generated()))
    })
}

fn timedtext_url(base_url: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url)
        .or_else(|_| Url::parse(YOUTUBE_ORIGIN).and_then(|origin| origin.join(base_url)))
        .with_context(|| format!("Invalid caption track URL: {}", base_url))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

#[derive(Debug, Deserialize)]
struct Json3Track {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: f64,
    #[serde(default)]
    d_duration_ms: f64,
    #[serde(default)]
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

fn parse_json3(body: &str) -> anyhow::Result<Vec<TranscriptFragment>> {
    let track: Json3Track =
        serde_json::from_str(body).context("Failed to parse caption track")?;

    Ok(track
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            if text.trim().is_empty() {
                return None;
            }
            Some(TranscriptFragment::new(
                text,
                event.t_start_ms / 1000.0,
                event.d_duration_ms / 1000.0,
            ))
        })
        .collect())
}
