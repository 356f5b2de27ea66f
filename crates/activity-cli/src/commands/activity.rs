//! Inspect stored activity records.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use activity_core::config::AppConfig;
use activity_core::error::AppError;
use activity_entity::activity::{ActivityState, ListStatus};
use activity_store::{ActivityStore, StoreManager};

use crate::output::{self, OutputFormat};

/// Arguments for activity commands
#[derive(Debug, Args)]
pub struct ActivityArgs {
    /// Activity subcommand
    #[command(subcommand)]
    pub command: ActivityCommand,
}

/// Activity subcommands
#[derive(Debug, Subcommand)]
pub enum ActivityCommand {
    /// Show the record of one user
    Show {
        /// Directory user id
        user_id: String,
    },
    /// List records of one status, ordered by deadline
    List {
        /// `pending` or `exempt`
        #[arg(long, default_value = "pending")]
        status: ListStatus,
        /// Only records whose deadline is strictly before this RFC 3339 instant
        #[arg(long)]
        before: Option<DateTime<Utc>>,
    },
}

/// Activity record display row
#[derive(Debug, Serialize, Tabled)]
pub struct ActivityRow {
    user_id: String,
    presence: String,
    secondary: String,
    conversing: bool,
    group: String,
    deadline: String,
    updated: String,
}

impl From<&ActivityState> for ActivityRow {
    fn from(state: &ActivityState) -> Self {
        Self {
            user_id: state.user_id.clone(),
            presence: state.presence.clone(),
            secondary: state.secondary_presence_id.clone(),
            conversing: state.conversing,
            group: if state.group_id.is_empty() {
                "-".to_string()
            } else {
                state.group_id.clone()
            },
            deadline: state
                .inactivity_deadline
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
            updated: state.last_updated.to_rfc3339(),
        }
    }
}

/// Execute activity commands
pub async fn execute(
    args: &ActivityArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if config.store.provider == "memory" {
        output::print_warning("In-memory store: only records written by this process are visible");
    }
    let store = StoreManager::new(&config.store).await?;

    match &args.command {
        ActivityCommand::Show { user_id } => {
            let state = store
                .get(user_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("No activity record for '{user_id}'")))?;
            match format {
                OutputFormat::Json => output::print_json(&state),
                OutputFormat::Table => output::print_list(&[ActivityRow::from(&state)], format),
            }
        }
        ActivityCommand::List { status, before } => {
            let records = store
                .list_all(*status, *before, config.store.page_size)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&records),
                OutputFormat::Table => {
                    let rows: Vec<ActivityRow> = records.iter().map(ActivityRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}
