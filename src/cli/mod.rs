//! Command-line front end for the Vaaman board descriptor.

pub mod board;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use vaaman::Config;

/// Inspect the Vicharak Vaaman board description.
#[derive(Parser, Debug)]
#[command(name = "vaaman", version, about)]
pub struct Cli {
    /// Config file (default: ~/.config/vaaman/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Platform model file to probe instead of the configured one
    #[arg(long, global = true)]
    pub model_path: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the board descriptor and print it
    Show {
        /// Print the full descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the 40-pin header table
    Pins,
    /// Print one pin, by header index or name
    Pin {
        /// Header index (1-40) or pin name such as "PWM0" or "TXD4"
        pin: String,
    },
    /// Print the detected platform variant
    Detect,
}

impl Cli {
    /// Resolve the effective config: file, env, then command-line flags.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };
        if let Some(path) = &self.model_path {
            config.model_path = path.clone();
        }
        Ok(config)
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    match cli.command {
        Command::Show { json } => board::cmd_show(&config, json),
        Command::Pins => board::cmd_pins(&config),
        Command::Pin { pin } => board::cmd_pin(&config, &pin),
        Command::Detect => board::cmd_detect(&config),
    }
}
