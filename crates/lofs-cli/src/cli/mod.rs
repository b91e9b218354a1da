//! CLI for the Lofs encrypted notes bundle.

mod commands;
mod password;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lofs_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_show, run_unlock};

/// Top-level CLI for the Lofs notes bundle.
#[derive(Debug, Parser)]
#[command(name = "lofs")]
#[command(about = "Lofs: fetch, decrypt and browse the encrypted notes bundle", long_about = None)]
pub struct Cli {
    /// Origin serving the bundle; overrides `base_url` from config.toml.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the encrypted bundle and print its size and SHA-256.
    Fetch,

    /// Decrypt the bundle and list its notes.
    Unlock {
        /// Read the bundle from a local file instead of the network.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Print the resolved notes as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the note for one day, with its neighbors.
    Show {
        /// Day to show, `YYYY-MM-DD`.
        date: String,
        /// Read the bundle from a local file instead of the network.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(base_url) = cli.base_url {
            cfg.base_url = base_url;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch => run_fetch(&cfg).await?,
            CliCommand::Unlock { file, json } => run_unlock(&cfg, file.as_deref(), json).await?,
            CliCommand::Show { date, file } => run_show(&cfg, &date, file.as_deref()).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
