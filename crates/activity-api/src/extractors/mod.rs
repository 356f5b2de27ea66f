//! Custom Axum extractors.

pub mod bearer;

pub use bearer::ReportAccess;
