//! Application settings management

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::blog::DEFAULT_WORD_COUNT;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Transcript service settings
    #[serde(default)]
    pub transcript: TranscriptSettings,

    /// LLM settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Output artifact settings
    #[serde(default)]
    pub output: OutputSettings,

    /// Blog generation settings
    #[serde(default)]
    pub blog: BlogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSettings {
    /// Caption languages to try, in order of preference
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// HTTP timeout for transcript requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai, gemini)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// HTTP timeout for completion requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory the blog post artifact is written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Artifact file name, overwritten on every run
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Where the download action copies the artifact (empty = user download dir)
    #[serde(default)]
    pub download_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogSettings {
    /// Word count preselected in the form and used by `generate`
    #[serde(default = "default_word_count")]
    pub default_word_count: u32,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    crate::llm::DEFAULT_OPENAI_MODEL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_name() -> String {
    "youtube_blog_post.md".to_string()
}

fn default_word_count() -> u32 {
    DEFAULT_WORD_COUNT
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_name: default_file_name(),
            download_dir: String::new(),
        }
    }
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            default_word_count: default_word_count(),
        }
    }
}

/// Environment lookup used when applying overrides.
///
/// Tests pass a closure over a fixed map instead of touching the process env.
type EnvLookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        settings.apply_env_overrides(&|key: &str| std::env::var(key).ok());

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self, env: &EnvLookup<'_>) {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = non_empty("OPENAI_MODEL_NAME") {
            if self.llm.provider.eq_ignore_ascii_case("openai") {
                self.llm.model = model.trim().to_string();
            }
        }

        if self.llm.api_key.trim().is_empty() {
            if let Some(key) = self.api_key_env_var().and_then(non_empty) {
                self.llm.api_key = key;
            }
        }

        if let Some(dir) = non_empty("VID2BLOG_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
    }

    /// Environment variable that carries the API key for the configured provider.
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self.llm.provider.to_lowercase().as_str() {
            "openai" => Some("OPENAI_API_KEY"),
            "gemini" => Some("GEMINI_API_KEY"),
            _ => None,
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "vid2blog", "vid2blog")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Full path of the blog post artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.file_name)
    }

    /// Directory the download action copies the artifact into
    pub fn download_dir(&self) -> PathBuf {
        if !self.output.download_dir.trim().is_empty() {
            return PathBuf::from(self.output.download_dir.trim());
        }

        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_blog_writer_settings() {
        let settings = Settings::default();
        assert_eq!(settings.llm.provider, "openai");
        assert_eq!(settings.llm.model, "gpt-4-0125-preview");
        assert_eq!(settings.output.file_name, "youtube_blog_post.md");
        assert_eq!(settings.blog.default_word_count, 200);
        assert_eq!(settings.transcript.languages, vec!["en".to_string()]);
    }

    #[test]
    fn model_name_env_overrides_config() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(&lookup(&[("OPENAI_MODEL_NAME", "gpt-4o-mini")]));
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn api_key_env_fills_empty_key_only() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(&lookup(&[("OPENAI_API_KEY", "sk-env")]));
        assert_eq!(settings.llm.api_key, "sk-env");

        let mut settings = Settings::default();
        settings.llm.api_key = "sk-file".to_string();
        settings.apply_env_overrides(&lookup(&[("OPENAI_API_KEY", "sk-env")]));
        assert_eq!(settings.llm.api_key, "sk-file");
    }

    #[test]
    fn gemini_reads_its_own_key_and_ignores_openai_model() {
        let mut settings = Settings::default();
        settings.llm.provider = "gemini".to_string();
        settings.llm.model = "gemini-2.5-flash".to_string();
        settings.apply_env_overrides(&lookup(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("GEMINI_API_KEY", "g-key"),
            ("OPENAI_MODEL_NAME", "gpt-4o"),
        ]));
        assert_eq!(settings.llm.api_key, "g-key");
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(&lookup(&[("OPENAI_MODEL_NAME", "  "), ("OPENAI_API_KEY", "")]));
        assert_eq!(settings.llm.model, "gpt-4-0125-preview");
        assert!(settings.llm.api_key.is_empty());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "gpt-4o"

            [output]
            dir = "/tmp/posts"
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.llm.provider, "openai");
        assert_eq!(settings.artifact_path(), PathBuf::from("/tmp/posts/youtube_blog_post.md"));
    }

    #[test]
    fn explicit_download_dir_wins() {
        let mut settings = Settings::default();
        settings.output.download_dir = "/tmp/downloads".to_string();
        assert_eq!(settings.download_dir(), PathBuf::from("/tmp/downloads"));
    }
}
