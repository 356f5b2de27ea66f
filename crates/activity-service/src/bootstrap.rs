//! Explicit startup initialization of the service graph.

use std::sync::Arc;

use tracing::info;

use activity_core::config::AppConfig;
use activity_core::error::{AppError, ErrorKind};
use activity_core::result::AppResult;
use activity_directory::{CredentialManager, DirectoryClient, DirectoryService};
use activity_entity::policy::TimeoutPolicy;
use activity_store::{ActivityStore, StoreManager};

use crate::reaper::ReaperSweep;
use crate::reconciler::EventReconciler;
use crate::report::ReportService;

/// Every long-lived component, built once per process.
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub config: Arc<AppConfig>,
    pub policy: Arc<TimeoutPolicy>,
    pub store: Arc<dyn ActivityStore>,
    pub directory: Arc<dyn DirectoryService>,
    pub reconciler: Arc<EventReconciler>,
    pub reaper: Arc<ReaperSweep>,
    pub report: Arc<ReportService>,
}

impl ServiceContainer {
    /// Build the store and directory client from configuration and acquire
    /// the first access token. Any failure here is fatal for the process.
    pub async fn initialize(config: AppConfig) -> AppResult<Self> {
        // ── Step 1: Activity store ───────────────────────────────────
        info!(provider = %config.store.provider, "Initializing activity store...");
        let store: Arc<dyn ActivityStore> = Arc::new(StoreManager::new(&config.store).await?);

        // ── Step 2: Directory client + credential ────────────────────
        info!(api = %config.directory.api_base(), "Initializing directory client...");
        let credentials = Arc::new(CredentialManager::new(&config.directory)?);
        let client = DirectoryClient::new(&config.directory, credentials)?;
        client.reauthenticate().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Authentication,
                "Initial directory authentication failed",
                e,
            )
        })?;
        info!("Directory credential acquired");

        // ── Step 3: Services ─────────────────────────────────────────
        Ok(Self::from_parts(config, store, Arc::new(client)))
    }

    /// Wire services around existing collaborators.
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn ActivityStore>,
        directory: Arc<dyn DirectoryService>,
    ) -> Self {
        let policy = Arc::new(TimeoutPolicy::from_config(&config.timeout_groups));
        info!(groups = policy.groups().len(), "Timeout policy loaded");

        let reconciler = Arc::new(EventReconciler::new(
            Arc::clone(&store),
            Arc::clone(&directory),
            Arc::clone(&policy),
            config.reconciler.clone(),
        ));
        let reaper = Arc::new(ReaperSweep::new(
            Arc::clone(&store),
            Arc::clone(&directory),
            &config.reaper,
            config.store.page_size,
        ));
        let report = Arc::new(ReportService::new(
            Arc::clone(&store),
            Arc::clone(&directory),
            Arc::clone(&policy),
            config.report.clone(),
            config.store.page_size,
        ));

        Self {
            config: Arc::new(config),
            policy,
            store,
            directory,
            reconciler,
            reaper,
            report,
        }
    }
}
