//! Video identifier extraction
//!
//! YouTube ids are 11 characters drawn from `[0-9A-Za-z_-]`. They show up
//! after `v=` on watch pages and after a path separator on short links,
//! embeds and shorts.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::{BlogError, Result};

static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .expect("video id pattern is valid")
});

/// A validated YouTube video id.
///
/// Only [`extract`] builds one, so holding a `VideoId` means the token has the
/// shape the transcript service expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the video id from a watch URL or a short link.
pub fn extract(url: &str) -> Result<VideoId> {
    let input = url.trim();

    VIDEO_ID_PATTERN
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
        .ok_or_else(|| BlogError::InvalidUrlFormat(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_watch_url() {
        let id = extract("https://www.youtube.com/watch?v=abcdefghijk").unwrap();
        assert_eq!(id.as_str(), "abcdefghijk");
    }

    #[test]
    fn extracts_id_when_other_query_params_follow() {
        let id = extract("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL1").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");

        let id = extract("https://m.youtube.com/watch?feature=share&v=a-b_c1D2e3F").unwrap();
        assert_eq!(id.as_str(), "a-b_c1D2e3F");
    }

    #[test]
    fn extracts_id_from_short_link() {
        let id = extract("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");

        let id = extract("https://youtu.be/dQw4w9WgXcQ?si=tracking").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn extracts_id_from_embed_and_shorts_paths() {
        let id = extract("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");

        let id = extract("https://www.youtube.com/shorts/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let id = extract("  https://youtu.be/dQw4w9WgXcQ \n").unwrap();
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
    }

    #[test]
    fn rejects_input_without_an_id() {
        for input in [
            "not-a-url",
            "",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch?v=short",
            "https://youtu.be/toolongidentifier",
        ] {
            match extract(input) {
                Err(BlogError::InvalidUrlFormat(_)) => {}
                other => panic!("expected InvalidUrlFormat for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn watch_url_round_trips_through_extract() {
        let id = extract("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(extract(&id.watch_url()).unwrap(), id);
    }
}
