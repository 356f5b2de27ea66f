//! Start the activity monitor server.

use clap::Args;

use activity_core::config::AppConfig;
use activity_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Serve HTTP only, without the reaper schedule
    #[arg(long)]
    pub no_reaper: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_reaper {
        config.reaper.enabled = false;
    }

    println!("Starting activity monitor...");
    println!("  Address: {}", config.server.bind_address());
    println!("  Store:   {}", config.store.provider);
    println!(
        "  Reaper:  {}",
        if config.reaper.enabled {
            config.reaper.schedule.as_str()
        } else {
            "disabled"
        }
    );

    activity_api::run_server(config).await
}
