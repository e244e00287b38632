//! CLI for reeldl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reeldl_core::config;
use reeldl_core::{MediaType, Platform};
use std::path::PathBuf;

use commands::{run_config, run_get, run_health, GetArgs};

/// Top-level CLI for reeldl.
#[derive(Debug, Parser)]
#[command(name = "reeldl")]
#[command(about = "reeldl: save YouTube, Instagram and TikTok media through a download backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download audio or video for a media URL.
    Get {
        /// Source platform: youtube, instagram or tiktok.
        platform: Platform,

        /// Media page URL (e.g. https://www.instagram.com/reel/...).
        url: String,

        /// What to save: audio (mp3) or video (mp4).
        #[arg(long = "type", default_value = "audio", value_name = "TYPE")]
        media_type: MediaType,

        /// Directory to save into (default: config download_dir, else current directory).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Backend base URL (overrides config backend_url).
        #[arg(long, value_name = "URL")]
        backend: Option<String>,

        /// Replace an existing file instead of saving as `name (n).ext`.
        #[arg(long)]
        overwrite: bool,
    },

    /// Check that the backend is reachable.
    Health {
        /// Backend base URL (overrides config backend_url).
        #[arg(long, value_name = "URL")]
        backend: Option<String>,
    },

    /// Show the config file path and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                platform,
                url,
                media_type,
                out,
                backend,
                overwrite,
            } => {
                let args = GetArgs {
                    platform,
                    url,
                    media_type,
                    out,
                    backend,
                    overwrite,
                };
                run_get(&cfg, args).await?;
            }
            CliCommand::Health { backend } => run_health(&cfg, backend.as_deref()).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
