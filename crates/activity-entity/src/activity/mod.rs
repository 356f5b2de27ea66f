//! Activity state domain entities.

pub mod model;
pub mod status;

pub use model::ActivityState;
pub use status::ListStatus;
