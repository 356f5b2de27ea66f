//! In-memory activity store.

pub mod store;

pub use store::MemoryActivityStore;
