//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use activity_core::config::AppConfig;
use activity_core::error::AppError;
use activity_store::redis::client::mask_redis_url;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration with secrets masked
    Show,
    /// Validate the configuration and print a summary
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let masked = masked(config);
            match format {
                OutputFormat::Json => output::print_json(&masked),
                OutputFormat::Table => println!("{masked:#?}"),
            }
        }
        ConfigCommand::Validate => {
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Server", &config.server.bind_address());
            output::print_kv("Store", &config.store.provider);
            output::print_kv("Directory API", &config.directory.api_base());
            output::print_kv("Timeout groups", &config.timeout_groups.len().to_string());
            output::print_kv("Reaper schedule", &config.reaper.schedule);
        }
    }

    Ok(())
}

fn masked(config: &AppConfig) -> AppConfig {
    let mut masked = config.clone();
    if !masked.directory.client_secret.is_empty() {
        masked.directory.client_secret = "****".to_string();
    }
    masked.store.redis.url = mask_redis_url(&masked.store.redis.url);
    masked
}
