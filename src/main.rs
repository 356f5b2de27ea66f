//! User Activity Monitor server
//!
//! Main entry point: loads configuration, initializes logging and hands
//! over to the API crate, which wires the store, directory client,
//! reaper schedule and HTTP server together.

use tracing_subscriber::{EnvFilter, fmt};

use activity_core::config::AppConfig;
use activity_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("ACTIVITY_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("ACTIVITY_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        "Starting user activity monitor v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        store = %config.store.provider,
        groups = config.timeout_groups.len(),
        reaper = config.reaper.enabled,
        "Configuration loaded"
    );

    activity_api::run_server(config).await?;

    tracing::info!("User activity monitor stopped");
    Ok(())
}
