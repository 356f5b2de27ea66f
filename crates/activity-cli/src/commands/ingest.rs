//! Apply one event envelope outside the HTTP server.

use clap::Args;
use tokio::io::AsyncReadExt;

use activity_core::config::AppConfig;
use activity_core::error::AppError;
use activity_entity::event::InboundEvent;
use activity_service::ServiceContainer;

use crate::commands::activity::ActivityRow;
use crate::output::{self, OutputFormat};

/// Arguments for the ingest command
#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Envelope JSON file, or `-` for stdin
    pub input: String,
}

async fn read_input(input: &str) -> Result<String, AppError> {
    if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .map_err(|e| AppError::validation(format!("Failed to read '{input}': {e}")))
    }
}

/// Execute the ingest command
pub async fn execute(
    args: &IngestArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let raw = read_input(&args.input).await?;
    // Reject malformed input before touching the directory.
    let event = InboundEvent::from_json(&raw)?;

    if config.store.provider == "memory" {
        output::print_warning("In-memory store: the result is discarded when the command exits");
    }

    let container = ServiceContainer::initialize(config).await?;
    let state = container.reconciler.handle(&event).await?;

    output::print_success(&format!(
        "Applied {} event for {}",
        event.kind_name(),
        event.user_id
    ));
    match format {
        OutputFormat::Json => output::print_json(&state),
        OutputFormat::Table => output::print_list(&[ActivityRow::from(&state)], format),
    }
    Ok(())
}
