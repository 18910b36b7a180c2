//! Pure estimation engine: load bookkeeping, runtime math, and array sizing.
//!
//! Everything in this module is stateless arithmetic over value records.
//! Nothing here performs I/O, validates user input, or mutates its inputs;
//! callers recompute on every edit and always get identical outputs for
//! identical inputs.

/// Appliance load entries and the ordered collection that owns them.
pub mod load;
/// Battery run-time estimation and duration formatting.
pub mod runtime;
/// Solar array, battery, and inverter sizing math.
pub mod sizing;

// Re-export the main types for convenience
pub use load::LoadBank;
pub use load::LoadItem;
pub use load::total_wattage;
pub use runtime::RuntimeSummary;
pub use runtime::compute_summary;
pub use runtime::format_hours;
pub use sizing::ArraySpec;
pub use sizing::BatterySpec;
pub use sizing::LoadProfile;
pub use sizing::SizingReport;
pub use sizing::StatusThresholds;
