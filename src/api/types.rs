//! API request, response, and query types.
//!
//! Sweep records use the CSV schema v1 column names for consistency
//! across export formats.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityEvent;
use crate::engine::{RuntimeSummary, SizingReport};

/// Combined report response: simple-calculator summary plus sizing report.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// Total draw and runtime for the configured loads.
    pub summary: RuntimeSummary,
    /// Full sizing report at the scenario's sun percentage.
    pub report: SizingReport,
}

/// One sweep record using CSV schema v1 field names.
#[derive(Debug, Serialize)]
pub struct SweepRecord {
    /// Sun level this row was evaluated at (0-100).
    pub sun_percent: f32,
    /// One panel's DC output (W).
    pub panel_instant_w: f32,
    /// AC power from one panel after all losses (W).
    pub ac_per_panel_w: f32,
    /// AC power from the whole array (W).
    pub total_ac_instant_w: f32,
    /// Daily array yield (Wh/day).
    pub daily_energy_wh_array: f32,
    /// Daily load requirement (Wh/day).
    pub daily_load_wh: f32,
    /// Back-solved required array power (W).
    pub required_array_power_w: f32,
    /// Recommended panel count.
    pub recommended_panel_count: u32,
    /// Usable battery energy (Wh).
    pub battery_usable_wh: f32,
    /// Battery-only autonomy (hours).
    pub hours_from_battery: f32,
    /// Array covers the load at this sun level.
    pub array_sufficient_instant: bool,
    /// Inverter rating covers the load.
    pub inverter_sufficient: bool,
    /// Daily yield and inverter both sufficient.
    pub system_can_run_continuously: bool,
}

impl From<&SizingReport> for SweepRecord {
    fn from(r: &SizingReport) -> Self {
        Self {
            sun_percent: r.sun_percent,
            panel_instant_w: r.panel_instant_w,
            ac_per_panel_w: r.ac_per_panel_w,
            total_ac_instant_w: r.total_ac_instant_w,
            daily_energy_wh_array: r.daily_energy_wh_array,
            daily_load_wh: r.daily_load_wh,
            required_array_power_w: r.required_array_power_w,
            recommended_panel_count: r.recommended_panel_count,
            battery_usable_wh: r.battery_usable_wh,
            hours_from_battery: r.hours_from_battery,
            array_sufficient_instant: r.array_sufficient_instant,
            inverter_sufficient: r.inverter_sufficient,
            system_can_run_continuously: r.system_can_run_continuously,
        }
    }
}

/// Optional sun-percent range query for the sweep endpoint.
#[derive(Debug, Deserialize)]
pub struct SweepQuery {
    /// Lower sun percent bound (inclusive).
    pub from: Option<f32>,
    /// Upper sun percent bound (inclusive).
    pub to: Option<f32>,
}

/// Insert request for the activity endpoint.
#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    /// Free-form activity message.
    pub message: String,
}

/// Insert acknowledgement for the activity endpoint.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    /// Always `true` on the 200 path.
    pub success: bool,
    /// The stored event, including its classification.
    pub event: ActivityEvent,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
