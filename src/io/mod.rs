//! Input/output helpers for exporting computed results.

/// CSV export for sun-sweep sizing results.
pub mod export;
