//! Runtime and array-sizing estimator for a portable solar power system.

/// Page-activity recording: user-agent classification and the logging queue.
pub mod activity;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Pure runtime and sizing computation engine.
pub mod engine;
pub mod input;
pub mod io;
pub mod store;
