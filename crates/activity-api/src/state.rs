//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use activity_core::config::AppConfig;
use activity_service::{EventReconciler, ReportService, ServiceContainer};
use activity_store::ActivityStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Activity store, used by the health check
    pub store: Arc<dyn ActivityStore>,
    /// Applies inbound notifications
    pub reconciler: Arc<EventReconciler>,
    /// Report assembly and bearer validation
    pub report: Arc<ReportService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Build the state from an initialized service container.
    pub fn from_container(container: &ServiceContainer) -> Self {
        Self {
            config: Arc::clone(&container.config),
            store: Arc::clone(&container.store),
            reconciler: Arc::clone(&container.reconciler),
            report: Arc::clone(&container.report),
            started_at: Instant::now(),
        }
    }
}
