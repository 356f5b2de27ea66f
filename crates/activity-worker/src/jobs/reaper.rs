//! Reaper sweep job handler.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use activity_core::error::ErrorKind;
use activity_service::ReaperSweep;

use crate::executor::{JobExecutionError, JobHandler, ScheduledRun};

/// Job type key of the reaper sweep.
pub const REAPER_JOB: &str = "reaper_sweep";

/// Runs the reaper sweep, skipping a trigger while a sweep is in progress.
#[derive(Debug)]
pub struct ReaperJobHandler {
    sweep: Arc<ReaperSweep>,
    running: AtomicBool,
}

/// Clears the running flag when the sweep finishes or panics.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ReaperJobHandler {
    /// Create a new reaper job handler
    pub fn new(sweep: Arc<ReaperSweep>) -> Self {
        Self {
            sweep,
            running: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl JobHandler for ReaperJobHandler {
    fn job_type(&self) -> &str {
        REAPER_JOB
    }

    async fn execute(&self, run: &ScheduledRun) -> Result<Option<Value>, JobExecutionError> {
        if self.running.swap(true, Ordering::AcqRel) {
            tracing::warn!(triggered_at = %run.triggered_at, "Previous reaper sweep still running, skipping");
            return Ok(Some(serde_json::json!({ "skipped": true })));
        }
        let _guard = RunningGuard(&self.running);

        let report = self.sweep.run_at(run.triggered_at).await.map_err(|e| match e.kind {
            ErrorKind::Authentication
            | ErrorKind::Store
            | ErrorKind::Directory
            | ErrorKind::Timeout
            | ErrorKind::ServiceUnavailable => JobExecutionError::Transient(e.to_string()),
            _ => JobExecutionError::Internal(e),
        })?;

        Ok(Some(serde_json::to_value(report).map_err(|e| {
            JobExecutionError::Internal(e.into())
        })?))
    }
}
