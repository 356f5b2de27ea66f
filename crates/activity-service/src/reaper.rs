//! Reaper sweep: force out users whose inactivity deadline has passed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use activity_core::config::{LogoutFailurePolicy, ReaperConfig};
use activity_core::error::{AppError, ErrorKind};
use activity_core::result::AppResult;
use activity_directory::DirectoryService;
use activity_entity::activity::{ActivityState, ListStatus};
use activity_store::ActivityStore;

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Deadlines strictly before this instant were due.
    pub cutoff: Option<DateTime<Utc>>,
    /// Due records found.
    pub examined: usize,
    /// Forced logouts that succeeded.
    pub logged_out: usize,
    /// Forced logouts that failed.
    pub logout_failures: usize,
    /// Records whose deadline was cleared and persisted.
    pub cleared: usize,
    /// Records left pending for the next sweep.
    pub retained: usize,
    /// Records whose cleared state could not be written.
    pub persist_failures: usize,
}

#[derive(Debug, Clone, Copy)]
enum ReapOutcome {
    Cleared { logged_out: bool },
    Retained,
    PersistFailed { logged_out: bool },
}

/// Scheduled sweep over the pending listing.
#[derive(Debug, Clone)]
pub struct ReaperSweep {
    store: Arc<dyn ActivityStore>,
    directory: Arc<dyn DirectoryService>,
    page_size: usize,
    concurrency: usize,
    on_logout_failure: LogoutFailurePolicy,
}

impl ReaperSweep {
    /// Creates a new sweep.
    pub fn new(
        store: Arc<dyn ActivityStore>,
        directory: Arc<dyn DirectoryService>,
        config: &ReaperConfig,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            directory,
            page_size: page_size.max(1),
            concurrency: config.concurrency.max(1),
            on_logout_failure: config.on_logout_failure,
        }
    }

    /// Run one sweep at the current time.
    pub async fn run(&self) -> AppResult<SweepReport> {
        self.run_at(Utc::now()).await
    }

    /// Run one sweep treating `now` as the cutoff.
    ///
    /// The due listing is drained completely before any logout, then each
    /// record is handled independently with bounded concurrency.
    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let due = self
            .store
            .list_all(ListStatus::Pending, Some(now), self.page_size)
            .await?;

        let mut report = SweepReport {
            cutoff: Some(now),
            examined: due.len(),
            ..SweepReport::default()
        };
        if due.is_empty() {
            info!(cutoff = %now, "Reaper sweep found no expired users");
            return Ok(report);
        }

        info!(cutoff = %now, count = due.len(), "Reaping expired users");

        if let Err(e) = self.directory.reauthenticate().await {
            error!(error = %e, "Directory reauthentication failed, aborting sweep");
            return Err(AppError::with_source(
                ErrorKind::Authentication,
                "Reauthentication failed before reaping",
                e,
            ));
        }

        let outcomes: Vec<ReapOutcome> = futures::stream::iter(due)
            .map(|state| self.reap_one(state, now))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                ReapOutcome::Cleared { logged_out } => {
                    report.cleared += 1;
                    tally_logout(&mut report, logged_out);
                }
                ReapOutcome::Retained => {
                    report.retained += 1;
                    report.logout_failures += 1;
                }
                ReapOutcome::PersistFailed { logged_out } => {
                    report.persist_failures += 1;
                    tally_logout(&mut report, logged_out);
                }
            }
        }

        info!(
            examined = report.examined,
            logged_out = report.logged_out,
            logout_failures = report.logout_failures,
            cleared = report.cleared,
            retained = report.retained,
            persist_failures = report.persist_failures,
            "Reaper sweep completed"
        );
        Ok(report)
    }

    async fn reap_one(&self, mut state: ActivityState, now: DateTime<Utc>) -> ReapOutcome {
        let logged_out = match self.directory.force_logout(&state.user_id).await {
            Ok(()) => {
                info!(user_id = %state.user_id, "Logged out inactive user");
                true
            }
            Err(e) => {
                error!(user_id = %state.user_id, error = %e, "Forced logout failed");
                false
            }
        };

        if !logged_out && self.on_logout_failure == LogoutFailurePolicy::RetryNextCycle {
            warn!(user_id = %state.user_id, "Leaving user pending for the next sweep");
            return ReapOutcome::Retained;
        }

        state.force_logout_clear(now);
        match self.store.put(&state).await {
            Ok(()) => ReapOutcome::Cleared { logged_out },
            Err(e) => {
                error!(user_id = %state.user_id, error = %e, "Failed to persist cleared record");
                ReapOutcome::PersistFailed { logged_out }
            }
        }
    }
}

fn tally_logout(report: &mut SweepReport, logged_out: bool) {
    if logged_out {
        report.logged_out += 1;
    } else {
        report.logout_failures += 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use activity_directory::mock::MockDirectory;
    use activity_store::MemoryActivityStore;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn pending(user_id: &str, offset_minutes: i64) -> ActivityState {
        let mut state = ActivityState::new(user_id, now());
        state.presence = "Available".into();
        state.group_id = "agents".into();
        state.inactivity_deadline = Some(now() + TimeDelta::minutes(offset_minutes));
        state
    }

    fn sweep(
        store: Arc<MemoryActivityStore>,
        directory: Arc<MockDirectory>,
        policy: LogoutFailurePolicy,
    ) -> ReaperSweep {
        let config = ReaperConfig {
            concurrency: 2,
            on_logout_failure: policy,
            ..ReaperConfig::default()
        };
        ReaperSweep::new(store, directory, &config, 2)
    }

    #[tokio::test]
    async fn test_expired_users_are_logged_out_and_cleared() {
        let store = Arc::new(MemoryActivityStore::default());
        store.put(&pending("a", -5)).await.unwrap();
        store.put(&pending("b", -1)).await.unwrap();
        store.put(&pending("c", -3)).await.unwrap();
        store.put(&pending("future", 10)).await.unwrap();
        let directory = Arc::new(MockDirectory::new());

        let report = sweep(store.clone(), directory.clone(), LogoutFailurePolicy::ClearDeadline)
            .run_at(now())
            .await
            .unwrap();

        assert_eq!(report.examined, 3);
        assert_eq!(report.logged_out, 3);
        assert_eq!(report.cleared, 3);
        assert_eq!(directory.reauth_calls(), 1);
        let mut calls = directory.logout_calls();
        calls.sort();
        assert_eq!(calls, vec!["a", "b", "c"]);

        let remaining = store.list_all(ListStatus::Pending, None, 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, "future");
        assert!(store.get("a").await.unwrap().unwrap().inactivity_deadline.is_none());
    }

    #[tokio::test]
    async fn test_nothing_due_skips_reauthentication() {
        let store = Arc::new(MemoryActivityStore::default());
        store.put(&pending("future", 10)).await.unwrap();
        let directory = Arc::new(MockDirectory::new());

        let report = sweep(store, directory.clone(), LogoutFailurePolicy::ClearDeadline)
            .run_at(now())
            .await
            .unwrap();

        assert_eq!(report.examined, 0);
        assert_eq!(directory.reauth_calls(), 0);
        assert!(directory.logout_calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_logout_still_clears_by_default() {
        let store = Arc::new(MemoryActivityStore::default());
        store.put(&pending("ok", -1)).await.unwrap();
        store.put(&pending("bad", -1)).await.unwrap();
        let directory = Arc::new(MockDirectory::new());
        directory.fail_logout_for("bad");

        let report = sweep(store.clone(), directory, LogoutFailurePolicy::ClearDeadline)
            .run_at(now())
            .await
            .unwrap();

        assert_eq!(report.logged_out, 1);
        assert_eq!(report.logout_failures, 1);
        assert_eq!(report.cleared, 2);
        assert!(store.get("bad").await.unwrap().unwrap().inactivity_deadline.is_none());
    }

    #[tokio::test]
    async fn test_failed_logout_retained_when_configured() {
        let store = Arc::new(MemoryActivityStore::default());
        store.put(&pending("ok", -1)).await.unwrap();
        store.put(&pending("bad", -1)).await.unwrap();
        let directory = Arc::new(MockDirectory::new());
        directory.fail_logout_for("bad");

        let report = sweep(store.clone(), directory, LogoutFailurePolicy::RetryNextCycle)
            .run_at(now())
            .await
            .unwrap();

        assert_eq!(report.cleared, 1);
        assert_eq!(report.retained, 1);
        assert_eq!(report.logout_failures, 1);
        let still_due = store.list_all(ListStatus::Pending, Some(now()), 10).await.unwrap();
        assert_eq!(still_due.len(), 1);
        assert_eq!(still_due[0].user_id, "bad");
    }

    #[tokio::test]
    async fn test_reauth_failure_aborts_before_any_logout() {
        let store = Arc::new(MemoryActivityStore::default());
        store.put(&pending("a", -1)).await.unwrap();
        let directory = Arc::new(MockDirectory::new());
        directory.set_reauth_fails(true);

        let err = sweep(store.clone(), directory.clone(), LogoutFailurePolicy::ClearDeadline)
            .run_at(now())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(directory.logout_calls().is_empty());
        assert!(store.get("a").await.unwrap().unwrap().inactivity_deadline.is_some());
    }

    #[tokio::test]
    async fn test_deadline_equal_to_cutoff_is_not_due() {
        let store = Arc::new(MemoryActivityStore::default());
        store.put(&pending("edge", 0)).await.unwrap();
        let directory = Arc::new(MockDirectory::new());

        let report = sweep(store, directory, LogoutFailurePolicy::ClearDeadline)
            .run_at(now())
            .await
            .unwrap();
        assert_eq!(report.examined, 0);
    }
}
