//! # activity-entity
//!
//! Domain models for the user activity monitor. The activity state and its
//! transition rules live here together with the value objects exchanged
//! with the directory service and the inbound event envelope. Nothing in
//! this crate performs I/O; every transition takes `now` explicitly.

pub mod activity;
pub mod conversation;
pub mod directory;
pub mod event;
pub mod policy;
pub mod presence;
