//! vid2blog - Turn YouTube videos into blog posts
//!
//! Entry point for the vid2blog CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vid2blog::cli::commands::GenerateOptions;
use vid2blog::cli::{Cli, Commands};
use vid2blog::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        vid2blog::cli::completions::print(shell);
        return Ok(());
    }

    // Load configuration only for runtime commands.
    let settings = Settings::load()?;

    let default_level = cli.default_log_level(&settings.general.log_level);

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!(
        "Loaded settings: provider={} model={}",
        settings.llm.provider,
        settings.llm.model
    );

    // Execute command
    match cli.command {
        Commands::Generate {
            url,
            words,
            output_dir,
            file_name,
            show_transcript,
            download,
        } => {
            let options = GenerateOptions {
                words,
                output_dir,
                file_name,
                show_transcript,
                download,
            };
            vid2blog::cli::commands::generate(&settings, &url, options).await?;
        }
        Commands::Tui => {
            vid2blog::tui::run(&settings).await?;
        }
        Commands::Doctor { json } => {
            vid2blog::cli::commands::run_doctor(&settings, json).await?;
        }
        Commands::Config(config_cmd) => {
            vid2blog::cli::commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
