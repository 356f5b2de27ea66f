//! CLI command definitions and dispatch.

pub mod activity;
pub mod config;
pub mod ingest;
pub mod serve;
pub mod sweep;

use clap::{Parser, Subcommand};

use activity_core::config::AppConfig;
use activity_core::error::AppError;

use crate::output::OutputFormat;

/// User activity monitor: inactivity timeouts and forced logout
#[derive(Debug, Parser)]
#[command(name = "activity-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "ACTIVITY_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server and the reaper schedule
    Serve(serve::ServeArgs),
    /// Run one reaper sweep now and print its summary
    Sweep,
    /// Apply one event envelope read from a file or stdin
    Ingest(ingest::IngestArgs),
    /// Inspect stored activity records
    Activity(activity::ActivityArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Sweep => sweep::execute(config, self.format).await,
            Commands::Ingest(args) => ingest::execute(args, config, self.format).await,
            Commands::Activity(args) => activity::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}
