//! The per-user activity record and its transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ListStatus;
use crate::conversation::ConversationSummary;
use crate::directory::DirectoryUser;
use crate::policy::{self, TimeoutPolicy};
use crate::presence::{self, PresenceUpdate};

/// Last known activity for one user.
///
/// `inactivity_deadline` is `None` exactly when the user is exempt: no
/// governing group, an ongoing conversation, or an exempt presence. The
/// only exception is a record cleared by [`ActivityState::force_logout_clear`],
/// which stays exempt until the next transition re-evaluates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityState {
    /// Directory user id.
    pub user_id: String,
    /// Coarse system presence as reported by the directory.
    #[serde(default)]
    pub presence: String,
    /// Fine-grained presence definition id.
    #[serde(default)]
    pub secondary_presence_id: String,
    /// Whether the user has live or wrap-up work on any channel.
    #[serde(default)]
    pub conversing: bool,
    /// Governing timeout group id, empty when none applies.
    #[serde(default)]
    pub group_id: String,
    /// When the user becomes eligible for forced logout.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub inactivity_deadline: Option<DateTime<Utc>>,
    /// Time of the last transition.
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

impl ActivityState {
    /// A blank record holding only the user id.
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            presence: String::new(),
            secondary_presence_id: String::new(),
            conversing: false,
            group_id: String::new(),
            inactivity_deadline: None,
            last_updated: now,
        }
    }

    /// Listing bucket for this record.
    pub fn list_status(&self) -> ListStatus {
        if self.inactivity_deadline.is_some() {
            ListStatus::Pending
        } else {
            ListStatus::Exempt
        }
    }

    /// Listing sort key: deadline in epoch milliseconds, `0` when exempt.
    pub fn list_sort_key(&self) -> i64 {
        self.inactivity_deadline
            .map(|deadline| deadline.timestamp_millis())
            .unwrap_or(0)
    }

    /// Whether the deadline has already passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.inactivity_deadline
            .is_some_and(|deadline| deadline < now)
    }

    /// Whether an incoming presence moves the user out of `offline`, which
    /// calls for a full directory refresh instead of a direct update.
    pub fn requires_refresh(&self, incoming_presence: &str) -> bool {
        presence::is_offline(&self.presence) && !presence::is_offline(incoming_presence)
    }

    /// Re-derive the deadline from the current fields.
    ///
    /// Every call re-anchors the deadline at `now`.
    pub fn recompute_deadline(&mut self, policy: &TimeoutPolicy, now: DateTime<Utc>) {
        self.last_updated = now;

        if self.group_id.is_empty()
            || self.conversing
            || policy::is_presence_exempt(&self.presence)
        {
            self.inactivity_deadline = None;
            return;
        }

        let Some(group) = policy.get(&self.group_id) else {
            tracing::warn!(
                user_id = %self.user_id,
                group_id = %self.group_id,
                "Timeout group is no longer configured, clearing deadline"
            );
            self.inactivity_deadline = None;
            return;
        };

        self.inactivity_deadline = group
            .timeout()
            .and_then(|timeout| now.checked_add_signed(timeout));
        if self.inactivity_deadline.is_none() {
            tracing::warn!(
                user_id = %self.user_id,
                group_id = %self.group_id,
                timeout_minutes = group.timeout_minutes,
                "Timeout out of range, clearing deadline"
            );
        }
    }

    /// Apply the presence fields of a notification directly.
    pub fn apply_presence_update(
        &mut self,
        update: &PresenceUpdate,
        policy: &TimeoutPolicy,
        now: DateTime<Utc>,
    ) {
        self.presence = update.system_presence().to_string();
        self.secondary_presence_id = update.definition_id().to_string();
        self.recompute_deadline(policy, now);
    }

    /// Replace the conversing flag from a conversation summary.
    pub fn apply_conversation_update(
        &mut self,
        summary: &ConversationSummary,
        policy: &TimeoutPolicy,
        now: DateTime<Utc>,
    ) {
        self.conversing = summary.any_active();
        self.recompute_deadline(policy, now);
    }

    /// Re-derive group, presence and conversing from a directory snapshot.
    pub fn apply_snapshot(
        &mut self,
        user: &DirectoryUser,
        policy: &TimeoutPolicy,
        now: DateTime<Utc>,
    ) {
        self.group_id = policy
            .resolve(user.group_ids())
            .map(|group| group.id.clone())
            .unwrap_or_default();
        self.presence = user.presence.system_presence().to_string();
        self.secondary_presence_id = user.presence.definition_id().to_string();
        self.conversing = user.conversation_summary.any_active();
        self.recompute_deadline(policy, now);
    }

    /// Clear the deadline after a forced logout, bypassing the policy.
    pub fn force_logout_clear(&mut self, now: DateTime<Utc>) {
        self.inactivity_deadline = None;
        self.last_updated = now;
    }
}
