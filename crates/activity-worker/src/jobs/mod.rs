//! Built-in job handler implementations.

pub mod reaper;

pub use reaper::{REAPER_JOB, ReaperJobHandler};
