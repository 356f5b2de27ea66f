//! # activity-directory
//!
//! Client for the external directory service that owns user identity,
//! group membership, presence and conversation counts. Exposes the
//! [`DirectoryService`] trait, the HTTP implementation [`DirectoryClient`]
//! and the [`CredentialManager`] that owns the access token.
//!
//! Enable the `mock` feature for [`mock::MockDirectory`], a scripted
//! in-process implementation used by tests.

pub mod client;
pub mod credentials;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

pub use client::DirectoryClient;
pub use credentials::CredentialManager;
pub use traits::DirectoryService;
