//! # activity-store
//!
//! Durable storage for activity records. Every backend supports point
//! reads and writes by user id plus a listing index by derived status
//! (`pending` / `exempt`) ordered by deadline. Two backends exist:
//!
//! - **memory**: in-process maps, used for development and tests
//! - **redis**: records as JSON strings with key expiry, sorted sets as the index
//!
//! The backend is selected at runtime based on configuration.

pub mod keys;
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
pub mod traits;

pub use memory::MemoryActivityStore;
pub use provider::StoreManager;
pub use traits::{ActivityPage, ActivityStore, ListQuery};
