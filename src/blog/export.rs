//! Blog post artifact
//!
//! Every successful run overwrites the same file. Concurrent runs race on it
//! and the last writer wins.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::blog::GeneratedPost;
use crate::config::Settings;
use crate::{BlogError, Result};

pub const MARKDOWN_MIME: &str = "text/markdown";

/// The file a post was written to, as offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: &'static str,
}

/// Writes generated posts to a fixed file name.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    file_name: String,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.output.dir.clone(), settings.output.file_name.clone())
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Write the post as UTF-8, replacing any previous artifact.
    pub fn write(&self, post: &GeneratedPost) -> Result<Artifact> {
        let path = self.path();

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))
            .map_err(BlogError::ExportFailed)?;

        std::fs::write(&path, post.as_str())
            .with_context(|| format!("Failed to write {}", path.display()))
            .map_err(BlogError::ExportFailed)?;

        tracing::info!("Blog post saved to {}", path.display());

        Ok(Artifact {
            path,
            file_name: self.file_name.clone(),
            mime: MARKDOWN_MIME,
        })
    }
}

/// Copy the artifact into `dest_dir` under its own file name.
pub fn download(artifact: &Artifact, dest_dir: &Path) -> Result<PathBuf> {
    let target = dest_dir.join(&artifact.file_name);

    if same_file(&artifact.path, &target) {
        return Ok(target);
    }

    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create download directory {}", dest_dir.display()))
        .map_err(BlogError::ExportFailed)?;

    std::fs::copy(&artifact.path, &target)
        .with_context(|| {
            format!(
                "Failed to copy {} to {}",
                artifact.path.display(),
                target.display()
            )
        })
        .map_err(BlogError::ExportFailed)?;

    tracing::info!("Blog post downloaded to {}", target.display());
    Ok(target)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
