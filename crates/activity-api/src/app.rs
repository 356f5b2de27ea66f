//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;

use activity_core::config::AppConfig;
use activity_core::config::app::CorsConfig;
use activity_core::error::AppError;
use activity_service::ServiceContainer;
use activity_worker::jobs::ReaperJobHandler;
use activity_worker::{CronScheduler, JobExecutor};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the activity monitor server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting activity monitor server...");

    // ── Step 1: Services (store, directory credential, policy) ───
    let container = ServiceContainer::initialize(config).await?;
    let config = Arc::clone(&container.config);

    // ── Step 2: Reaper schedule ──────────────────────────────────
    let mut scheduler = if config.reaper.enabled {
        Some(start_reaper(&container).await?)
    } else {
        tracing::warn!("Reaper sweep disabled; expired users will not be logged out");
        None
    };

    // ── Step 3: Build and start HTTP server ──────────────────────
    let app = build_app(AppState::from_container(&container), &config.server.cors);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Activity monitor listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    // ── Step 4: Drain background work ────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!("Cron scheduler did not stop within the grace period"),
        }
    }

    served
}

async fn start_reaper(container: &ServiceContainer) -> Result<CronScheduler, AppError> {
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(ReaperJobHandler::new(Arc::clone(
        &container.reaper,
    ))));

    let scheduler = CronScheduler::new(Arc::new(executor)).await?;
    scheduler
        .register_reaper_sweep(&container.config.reaper.schedule)
        .await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
