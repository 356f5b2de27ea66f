//! Event reconciler: load-or-create, apply transition, persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use activity_core::config::ReconcilerConfig;
use activity_core::result::AppResult;
use activity_directory::DirectoryService;
use activity_entity::activity::ActivityState;
use activity_entity::event::{InboundEvent, InboundEventKind};
use activity_entity::policy::TimeoutPolicy;
use activity_entity::presence::PresenceUpdate;
use activity_store::ActivityStore;

/// Applies presence and conversation notifications to activity records.
///
/// Each call is an independent read-modify-write. Concurrent events for the
/// same user are last-write-wins at the record level.
#[derive(Debug, Clone)]
pub struct EventReconciler {
    store: Arc<dyn ActivityStore>,
    directory: Arc<dyn DirectoryService>,
    policy: Arc<TimeoutPolicy>,
    config: ReconcilerConfig,
}

impl EventReconciler {
    /// Creates a new reconciler.
    pub fn new(
        store: Arc<dyn ActivityStore>,
        directory: Arc<dyn DirectoryService>,
        policy: Arc<TimeoutPolicy>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            directory,
            policy,
            config,
        }
    }

    /// Reconcile one event at the current time.
    pub async fn handle(&self, event: &InboundEvent) -> AppResult<ActivityState> {
        self.handle_at(event, Utc::now()).await
    }

    /// Reconcile one event as of `now`.
    ///
    /// A failed read degrades to a fresh record; a failed write is returned.
    /// The directory is consulted at most once per event.
    pub async fn handle_at(
        &self,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> AppResult<ActivityState> {
        let LoadedRecord {
            mut state,
            directory_consulted,
        } = self.load_or_create(&event.user_id, now).await;
        debug!(user_id = %event.user_id, kind = event.kind_name(), before = ?state, "Applying event");

        match &event.kind {
            InboundEventKind::Presence(update) => {
                self.apply_presence(&mut state, update, directory_consulted, now)
                    .await
            }
            InboundEventKind::Conversation(summary) => {
                state.apply_conversation_update(summary, &self.policy, now)
            }
        }

        debug!(user_id = %state.user_id, after = ?state, "Event applied");

        if let Err(e) = self.store.put(&state).await {
            error!(user_id = %state.user_id, error = %e, "Failed to persist activity record");
            return Err(e);
        }

        info!(
            user_id = %state.user_id,
            kind = event.kind_name(),
            status = %state.list_status(),
            deadline = ?state.inactivity_deadline,
            "Activity reconciled"
        );
        Ok(state)
    }

    /// Load a record, creating it from a directory snapshot when absent.
    ///
    /// Records whose deadline already passed are refreshed from the
    /// directory when `refresh_expired_on_load` is set.
    pub async fn load_or_create(&self, user_id: &str, now: DateTime<Utc>) -> LoadedRecord {
        match self.store.get(user_id).await {
            Ok(Some(mut state)) => {
                let stale = self.config.refresh_expired_on_load && state.is_expired(now);
                if stale {
                    debug!(user_id = %user_id, "Stored deadline already passed, refreshing from directory");
                    self.refresh(&mut state, now).await;
                }
                LoadedRecord {
                    state,
                    directory_consulted: stale,
                }
            }
            Ok(None) => {
                debug!(user_id = %user_id, "No activity record, creating");
                self.create(user_id, now).await
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Activity read failed, treating record as absent");
                self.create(user_id, now).await
            }
        }
    }

    async fn create(&self, user_id: &str, now: DateTime<Utc>) -> LoadedRecord {
        let mut state = ActivityState::new(user_id, now);
        if !self.refresh(&mut state, now).await {
            state.recompute_deadline(&self.policy, now);
        }
        LoadedRecord {
            state,
            directory_consulted: true,
        }
    }

    /// Re-derive the record from a directory snapshot. Returns whether it succeeded.
    async fn refresh(&self, state: &mut ActivityState, now: DateTime<Utc>) -> bool {
        match self.directory.get_user(&state.user_id).await {
            Ok(user) => {
                state.apply_snapshot(&user, &self.policy, now);
                true
            }
            Err(e) => {
                warn!(user_id = %state.user_id, error = %e, "Directory refresh failed");
                false
            }
        }
    }

    async fn apply_presence(
        &self,
        state: &mut ActivityState,
        update: &PresenceUpdate,
        directory_consulted: bool,
        now: DateTime<Utc>,
    ) {
        // A snapshot taken for this event already carries the current groups.
        if !directory_consulted && state.requires_refresh(update.system_presence()) {
            debug!(user_id = %state.user_id, "User left offline, refreshing from directory");
            if self.refresh(state, now).await {
                return;
            }
        }
        state.apply_presence_update(update, &self.policy, now);
    }
}

/// A record ready for an event.
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    pub state: ActivityState,
    /// Whether a directory fetch was already attempted for this event.
    pub directory_consulted: bool,
}
