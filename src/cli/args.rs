//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::blog::validate_word_count;

/// vid2blog - Turn YouTube videos into blog posts
#[derive(Parser, Debug)]
#[command(name = "vid2blog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    ///
    /// The TUI owns stderr through the alternate screen, so it logs nothing.
    pub fn default_log_level<'a>(&self, configured: &'a str) -> &'a str {
        match (&self.command, self.verbose) {
            (Commands::Tui, _) => "off",
            (_, true) => "debug",
            _ => configured,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a blog post from a YouTube video
    Generate {
        /// YouTube video URL (watch page or youtu.be short link)
        url: String,

        /// Approximate length of the post (100-500, step 50)
        #[arg(short, long, value_parser = parse_word_count)]
        words: Option<u32>,

        /// Directory to write the post to (overrides output.dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// File name of the post (overrides output.file_name)
        #[arg(long)]
        file_name: Option<String>,

        /// Also print the fetched transcript
        #[arg(long)]
        show_transcript: bool,

        /// Copy the saved post to a download directory (defaults to the user's downloads)
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        download: Option<Option<PathBuf>>,
    },

    /// Launch the interactive form
    Tui,

    /// Check configuration and credentials
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_word_count(value: &str) -> Result<u32, String> {
    let count: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", value))?;
    validate_word_count(count)
}
