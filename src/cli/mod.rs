//! CLI interface for tick-relay
//!
//! Provides subcommands for:
//! - `run`: Start the ingestion and broadcast pipeline
//! - `config`: Show effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tick-relay")]
#[command(about = "Real-time market data ingestion, normalization, and fan-out service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the ingestion and broadcast pipeline
    Run(RunArgs),
    /// Show effective configuration
    Config,
}
