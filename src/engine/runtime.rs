//! Battery run-time estimation for the simple calculator.

use serde::Serialize;

use super::load::{LoadItem, total_wattage};

/// Derived totals for one battery-plus-loads configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeSummary {
    /// Combined draw of all selected items (W).
    pub total_wattage_w: f32,
    /// Achievable run time at that draw (hours). Zero draw yields `0.0`,
    /// a degenerate no-load state — not unlimited runtime.
    pub runtime_hours: f32,
}

/// Computes the total draw and achievable run time.
///
/// Run time is `capacity_wh / total draw` when any selected item draws
/// power, and `0.0` otherwise. No input combination raises an error;
/// keeping negative or non-finite values out is the input layer's job.
pub fn compute_summary(capacity_wh: f32, items: &[LoadItem]) -> RuntimeSummary {
    let total_wattage_w = total_wattage(items);
    let runtime_hours = if total_wattage_w > 0.0 {
        capacity_wh / total_wattage_w
    } else {
        0.0
    };
    RuntimeSummary {
        total_wattage_w,
        runtime_hours,
    }
}

/// Formats a duration in hours as `"{H}h {M}m"`.
///
/// Minutes are rounded but not carry-normalized, so values just under a
/// whole hour can render as `"2h 60m"`. That is the shipped display
/// contract; normalizing it would change observable output.
pub fn format_hours(hours: f32) -> String {
    if hours == 0.0 {
        return "0h 0m".to_string();
    }
    let h = hours.floor();
    let m = ((hours - h) * 60.0).round();
    format!("{}h {}m", h as u64, m as u64)
}
