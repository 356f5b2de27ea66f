//! One-off reaper sweep.

use serde::Serialize;
use tabled::Tabled;

use activity_core::config::AppConfig;
use activity_core::error::AppError;
use activity_service::{ServiceContainer, SweepReport};

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct CounterRow {
    counter: &'static str,
    value: usize,
}

fn rows(report: &SweepReport) -> Vec<CounterRow> {
    [
        ("examined", report.examined),
        ("logged_out", report.logged_out),
        ("logout_failures", report.logout_failures),
        ("cleared", report.cleared),
        ("retained", report.retained),
        ("persist_failures", report.persist_failures),
    ]
    .into_iter()
    .map(|(counter, value)| CounterRow { counter, value })
    .collect()
}

/// Execute the sweep command
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let container = ServiceContainer::initialize(config).await?;
    let report = container.reaper.run().await?;

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            if let Some(cutoff) = report.cutoff {
                output::print_kv("cutoff", &cutoff.to_rfc3339());
            }
            output::print_list(&rows(&report), format);
        }
    }
    Ok(())
}
