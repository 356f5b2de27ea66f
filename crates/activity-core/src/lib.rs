//! # activity-core
//!
//! Core crate for the user activity monitor. Contains the configuration
//! schema and loader, and the unified error system shared by every other
//! crate in the workspace.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
