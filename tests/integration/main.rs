//! End-to-end tests driving the assembled router with an in-memory store
//! and a scripted directory.

mod helpers;

mod events_test;
mod health_test;
mod report_test;
mod sweep_test;
