//! Joined activity report for the dashboard.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use activity_core::config::ReportConfig;
use activity_core::error::AppError;
use activity_core::result::AppResult;
use activity_directory::DirectoryService;
use activity_entity::activity::{ActivityState, ListStatus};
use activity_entity::directory::{DirectoryUser, PresenceDefinition};
use activity_entity::policy::TimeoutPolicy;
use activity_store::ActivityStore;

/// Placeholder for lookups that found nothing.
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of the report: the stored record plus display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReportEntry {
    #[serde(flatten)]
    pub activity: ActivityState,
    pub user_name: String,
    pub user_image: String,
    pub secondary_presence_name: String,
    pub status: ListStatus,
    pub group_name: String,
}

/// Builds the report and guards access to it.
#[derive(Debug, Clone)]
pub struct ReportService {
    store: Arc<dyn ActivityStore>,
    directory: Arc<dyn DirectoryService>,
    policy: Arc<TimeoutPolicy>,
    config: ReportConfig,
    page_size: usize,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(
        store: Arc<dyn ActivityStore>,
        directory: Arc<dyn DirectoryService>,
        policy: Arc<TimeoutPolicy>,
        config: ReportConfig,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            directory,
            policy,
            config,
            page_size: page_size.max(1),
        }
    }

    /// Validate an `Authorization` header value.
    ///
    /// The bearer token must belong to the configured organization. Every
    /// failure is an authentication error; the reason is only logged.
    pub async fn authorize(&self, authorization: Option<&str>) -> AppResult<()> {
        let denied = |reason: &str| {
            warn!(reason, "Report access denied");
            AppError::authentication("Unauthorized")
        };

        let header = authorization.ok_or_else(|| denied("missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| denied("expected 'Bearer <token>'"))?
            .trim();
        if token.is_empty() {
            return Err(denied("empty bearer token"));
        }
        if self.config.expected_organization_id.is_empty() {
            return Err(denied("expected organization id is not configured"));
        }

        let organization = self
            .directory
            .token_organization(token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Token owner lookup failed");
                denied("token owner lookup failed")
            })?;
        if organization != self.config.expected_organization_id {
            return Err(denied("organization mismatch"));
        }
        Ok(())
    }

    /// Assemble the report: pending records first, then exempt ones.
    pub async fn build_report(&self) -> AppResult<Vec<ActivityReportEntry>> {
        let pending = self
            .store
            .list_all(ListStatus::Pending, None, self.page_size)
            .await?;
        let exempt = self
            .store
            .list_all(ListStatus::Exempt, None, self.page_size)
            .await?;

        let mut user_ids: Vec<String> = pending
            .iter()
            .chain(exempt.iter())
            .map(|state| state.user_id.clone())
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let users = if user_ids.is_empty() {
            HashMap::new()
        } else {
            self.directory.get_users_batch(&user_ids).await?
        };
        let presences = self.directory.get_presence_definitions().await?;

        let mut entries = Vec::with_capacity(pending.len() + exempt.len());
        for (records, status) in [(pending, ListStatus::Pending), (exempt, ListStatus::Exempt)] {
            entries.extend(
                records
                    .into_iter()
                    .map(|state| self.extend(state, status, &users, &presences)),
            );
        }

        info!(entries = entries.len(), "Activity report assembled");
        Ok(entries)
    }

    fn extend(
        &self,
        activity: ActivityState,
        status: ListStatus,
        users: &HashMap<String, DirectoryUser>,
        presences: &HashMap<String, PresenceDefinition>,
    ) -> ActivityReportEntry {
        let (user_name, user_image) = match users.get(&activity.user_id) {
            Some(user) => (
                user.name.clone(),
                user.thumbnail().unwrap_or_default().to_string(),
            ),
            None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        };

        let secondary_presence_name = presences
            .get(&activity.secondary_presence_id)
            .and_then(|definition| definition.label(&self.config.presence_label_locale))
            .unwrap_or(NOT_AVAILABLE)
            .to_string();

        let group_name = self
            .policy
            .get(&activity.group_id)
            .map(|group| group.display_label())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        ActivityReportEntry {
            activity,
            user_name,
            user_image,
            secondary_presence_name,
            status,
            group_name,
        }
    }
}
