//! CLI command implementations

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::blog::{self, validate_word_count, BlogPipeline, BlogRequest, Stage};
use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::build_provider;
use crate::BlogError;

/// Options of the `generate` command
#[derive(Debug, Default)]
pub struct GenerateOptions {
    pub words: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub show_transcript: bool,
    pub download: Option<Option<PathBuf>>,
}

/// Generate a blog post for one video and save it
pub async fn generate(settings: &Settings, url: &str, options: GenerateOptions) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(dir) = options.output_dir {
        settings.output.dir = dir;
    }
    if let Some(name) = options.file_name {
        settings.output.file_name = name;
    }

    let word_count = resolve_word_count(options.words, &settings)?;
    let request = BlogRequest::new(url, word_count);

    // Reject malformed URLs before any credential or network work.
    let video = request.video()?;
    eprintln!("Video: {}", video.watch_url());

    let pipeline = BlogPipeline::new(&settings)?;
    let progress = |stage: Stage| eprintln!("{}", stage.message());
    let outcome = pipeline.run(&video, request.word_count, &progress).await?;

    if options.show_transcript {
        eprintln!();
        eprintln!("Transcript ({} words):", outcome.transcript.word_count());
        eprintln!("{}", outcome.transcript);
        eprintln!();
    }

    println!("{}", outcome.post);

    let artifact = outcome.export?;
    eprintln!();
    eprintln!(
        "Here's your blog post! Saved to {} ({})",
        artifact.path.display(),
        artifact.mime
    );

    if let Some(dest) = options.download {
        let dir = dest.unwrap_or_else(|| settings.download_dir());
        let copied = blog::download(&artifact, &dir)?;
        eprintln!("Downloaded to {}", copied.display());
    }

    Ok(())
}

fn resolve_word_count(words: Option<u32>, settings: &Settings) -> Result<u32> {
    match words {
        Some(count) => Ok(count),
        None => validate_word_count(settings.blog.default_word_count).map_err(|e| {
            anyhow::Error::from(BlogError::Config(format!(
                "blog.default_word_count: {}",
                e
            )))
        }),
    }
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&redacted(settings))?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn redacted(settings: &Settings) -> Settings {
    let mut shown = settings.clone();
    if !shown.llm.api_key.is_empty() {
        shown.llm.api_key = "********".to_string();
    }
    shown
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    provider: String,
    model: String,
    config_file: String,
    artifact: String,
    checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    fn healthy(&self) -> bool {
        self.checks.iter().all(|c| c.status != "error")
    }
}

/// Run diagnostic checks to help troubleshoot local setup issues.
pub async fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("vid2blog doctor");
    println!("provider: {} ({})", report.provider, report.model);
    println!("config:   {}", report.config_file);
    println!("artifact: {}", report.artifact);
    println!();

    for check in &report.checks {
        println!("{:<12} {:<8} {}", check.name, check.status, check.detail);
    }

    if !report.healthy() {
        println!();
        println!("hint: run `vid2blog config init` and edit the [llm] section.");
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let config_file = match Settings::config_path() {
        Ok(path) if path.exists() => path.display().to_string(),
        Ok(path) => format!("{} (not found, using defaults)", path.display()),
        Err(e) => format!("unknown ({})", e),
    };

    let mut checks = Vec::new();

    checks.push(match build_provider(settings) {
        Ok(provider) => DoctorCheck {
            name: "llm",
            status: "ok",
            detail: format!("{} client ready with model {}", provider.name(), provider.model()),
        },
        Err(e) => DoctorCheck {
            name: "llm",
            status: "error",
            detail: format!("{:#}", e),
        },
    });

    checks.push(match validate_word_count(settings.blog.default_word_count) {
        Ok(count) => DoctorCheck {
            name: "word_count",
            status: "ok",
            detail: format!("default {}", count),
        },
        Err(e) => DoctorCheck {
            name: "word_count",
            status: "error",
            detail: e,
        },
    });

    checks.push(dir_check("output", &settings.output.dir));
    checks.push(dir_check("downloads", &settings.download_dir()));

    DoctorReport {
        provider: settings.llm.provider.clone(),
        model: settings.llm.model.clone(),
        config_file,
        artifact: settings.artifact_path().display().to_string(),
        checks,
    }
}

// Helper functions

fn dir_check(name: &'static str, dir: &Path) -> DoctorCheck {
    if dir.is_dir() {
        let writable = std::fs::metadata(dir)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false);
        DoctorCheck {
            name,
            status: if writable { "ok" } else { "error" },
            detail: if writable {
                dir.display().to_string()
            } else {
                format!("{} is read-only", dir.display())
            },
        }
    } else if dir.exists() {
        DoctorCheck {
            name,
            status: "error",
            detail: format!("{} is not a directory", dir.display()),
        }
    } else {
        DoctorCheck {
            name,
            status: "warning",
            detail: format!("{} will be created on first save", dir.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_word_count_wins_over_settings() {
        let mut settings = Settings::default();
        settings.blog.default_word_count = 450;
        assert_eq!(resolve_word_count(Some(150), &settings).unwrap(), 150);
        assert_eq!(resolve_word_count(None, &settings).unwrap(), 450);
    }

    #[test]
    fn invalid_configured_word_count_is_a_config_error() {
        let mut settings = Settings::default();
        settings.blog.default_word_count = 333;
        let err = resolve_word_count(None, &settings).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BlogError>(),
            Some(BlogError::Config(_))
        ));
    }

    #[test]
    fn show_masks_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-secret".to_string();
        let shown = toml::to_string_pretty(&redacted(&settings)).unwrap();
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("********"));
    }

    #[test]
    fn doctor_flags_missing_key_and_blocked_output() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let mut settings = Settings::default();
        settings.llm.api_key.clear();
        settings.output.dir = blocker;
        settings.output.download_dir = tmp.path().display().to_string();

        let report = collect_doctor_report(&settings);
        let status = |name: &str| {
            report
                .checks
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.status)
        };

        assert_eq!(status("llm"), Some("error"));
        assert_eq!(status("output"), Some("error"));
        assert_eq!(status("downloads"), Some("ok"));
        assert!(!report.healthy());
    }

    #[tokio::test]
    async fn generate_rejects_bad_url_without_writing() {
        let tmp = tempdir().unwrap();
        let err = generate(
            &Settings::default(),
            "not-a-url",
            GenerateOptions {
                output_dir: Some(tmp.path().to_path_buf()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BlogError>(),
            Some(BlogError::InvalidUrlFormat(_))
        ));
        assert!(!tmp.path().join("youtube_blog_post.md").exists());
    }
}
