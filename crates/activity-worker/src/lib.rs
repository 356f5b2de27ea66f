//! Scheduled background work for the activity monitor.
//!
//! This crate provides:
//! - A cron scheduler that triggers jobs on their schedule
//! - A job executor that dispatches a triggered run to its handler
//! - The reaper sweep job handler

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler, ScheduledRun};
pub use scheduler::CronScheduler;
