//! # activity-service
//!
//! Use cases of the activity monitor. Each service receives its
//! collaborators (store, directory, policy) as `Arc` references at
//! construction time:
//!
//! - [`EventReconciler`] applies inbound notifications to activity records
//! - [`ReaperSweep`] forces out users whose deadline has passed
//! - [`ReportService`] assembles the joined activity report
//!
//! [`ServiceContainer`] performs the explicit startup initialization.

pub mod bootstrap;
pub mod reaper;
pub mod reconciler;
pub mod report;

pub use bootstrap::ServiceContainer;
pub use reaper::{ReaperSweep, SweepReport};
pub use reconciler::{EventReconciler, LoadedRecord};
pub use report::{ActivityReportEntry, ReportService};
