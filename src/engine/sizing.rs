//! Solar array, battery, and inverter sizing math for the extended calculator.

use std::fmt;

use serde::Serialize;

/// Solar array and charge-controller parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySpec {
    /// Nameplate rating of one panel (W).
    pub panel_rated_watts_w: f32,
    /// Panel operating voltage (V).
    pub panel_voltage_v: f32,
    /// Number of panels installed.
    pub panel_count: u32,
    /// Multiplicative loss for soiling/mismatch/temperature (0-1).
    pub derate_factor: f32,
    /// Equivalent full-sun hours per day.
    pub peak_sun_hours: f32,
    /// MPPT charge-controller current rating (A).
    pub mppt_rated_current_a: f32,
    /// MPPT conversion efficiency (0-1).
    pub mppt_efficiency: f32,
}

/// Battery bank parameters for the extended calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySpec {
    /// System voltage (V).
    pub voltage_v: f32,
    /// Rated capacity (Ah).
    pub amp_hours_ah: f32,
    /// Round-trip charge/discharge efficiency (0-1).
    pub round_trip_efficiency: f32,
    /// Usable fraction of rated capacity (0-1).
    pub depth_of_discharge: f32,
}

/// Continuous load and inverter parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfile {
    /// Total continuous AC load (W).
    pub total_continuous_load_w: f32,
    /// Inverter DC-to-AC efficiency (0-1).
    pub inverter_efficiency: f32,
    /// Maximum continuous inverter output (W).
    pub inverter_rated_w: f32,
    /// Oversizing multiplier applied to requirements (>= 1).
    pub safety_margin: f32,
}

/// Display thresholds for the battery-autonomy status flags.
///
/// These are product decisions, not physics, so they are inputs rather
/// than constants baked into the math.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusThresholds {
    /// Battery-only hours below which the low-battery flag raises.
    pub low_battery_hours: f32,
    /// Battery-only hours below which grid fallback is flagged as likely.
    pub grid_fallback_hours: f32,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            low_battery_hours: 2.0,
            grid_fallback_hours: 1.0,
        }
    }
}

/// Substitutes `1.0` for a zero denominator.
///
/// Degenerate inputs (zero sun hours, zero panel rating, zero load) then
/// produce finite upper-bound figures instead of NaN or infinity reaching
/// the display layer. The substituted results are numerically dubious but
/// are the shipped contract for degenerate-input display.
fn nonzero(denominator: f32) -> f32 {
    if denominator == 0.0 { 1.0 } else { denominator }
}

/// Every derived figure of the extended calculator for one input set.
///
/// Computed in full on every call; there is no partial recomputation and
/// no field-ordering dependency. Identical inputs yield bit-identical
/// reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    /// Sun percentage the instantaneous figures were evaluated at (0-100).
    pub sun_percent: f32,

    /// One panel's DC output at the given sun percentage (W).
    pub panel_instant_w: f32,
    /// Panel output after the derate factor (W).
    pub after_derate_w: f32,
    /// Panel output after MPPT conversion losses (W).
    pub after_mppt_w: f32,
    /// AC power available from one panel after the inverter (W).
    pub ac_per_panel_w: f32,

    /// AC power available from the whole array right now (W).
    pub total_ac_instant_w: f32,
    /// Daily AC energy yield of the whole array (Wh/day).
    pub daily_energy_wh_array: f32,
    /// Daily energy the continuous load requires (Wh/day).
    pub daily_load_wh: f32,

    /// Combined derate x MPPT x inverter efficiency (0-1).
    pub combined_efficiency: f32,
    /// Array power required to cover the daily load with margin (W).
    pub required_array_power_w: f32,
    /// Panel count needed to reach the required array power.
    pub recommended_panel_count: u32,

    /// Rated battery energy (Wh).
    pub battery_total_wh: f32,
    /// Usable battery energy after DoD and round-trip losses (Wh).
    pub battery_usable_wh: f32,
    /// Hours the load runs from battery alone, no sun.
    pub hours_from_battery: f32,
    /// Battery capacity needed for 24h autonomy of the load (Ah).
    pub recommended_battery_ah: f32,

    /// DC current of one panel at rated power (A).
    pub panel_rated_current_a: f32,
    /// Whether the MPPT current rating covers one panel.
    pub mppt_sufficient_for_one_panel: bool,
    /// Whether the inverter rating covers the continuous load.
    pub inverter_sufficient: bool,
    /// Whether the array covers the load instantaneously at this sun level.
    pub array_sufficient_instant: bool,
    /// Whether the daily array yield covers the daily load with margin.
    pub array_sufficient_daily: bool,
    /// Daily yield and inverter rating both sufficient.
    pub system_can_run_continuously: bool,

    /// Battery autonomy below the configured low-battery threshold.
    pub low_battery_risk: bool,
    /// Battery autonomy below the configured grid-fallback threshold.
    pub likely_grid_fallback_soon: bool,
}

impl SizingReport {
    /// Evaluates the full sizing model at one sun percentage.
    ///
    /// Pure and idempotent: no hidden state, no ordering dependency
    /// between fields. Out-of-range inputs are garbage-in/garbage-out;
    /// the only guarantee is that no division by zero occurs (see
    /// [`nonzero`]).
    pub fn compute(
        array: &ArraySpec,
        battery: &BatterySpec,
        load: &LoadProfile,
        sun_percent: f32,
        thresholds: &StatusThresholds,
    ) -> Self {
        // Per-panel instantaneous chain: DC -> derate -> MPPT -> inverter
        let panel_instant_w = array.panel_rated_watts_w * (sun_percent / 100.0);
        let after_derate_w = panel_instant_w * array.derate_factor;
        let after_mppt_w = after_derate_w * array.mppt_efficiency;
        let ac_per_panel_w = after_mppt_w * load.inverter_efficiency;

        let panel_count = array.panel_count as f32;
        let total_ac_instant_w = ac_per_panel_w * panel_count;
        let daily_energy_wh_array = ac_per_panel_w * array.peak_sun_hours * panel_count;
        let daily_load_wh = load.total_continuous_load_w * 24.0;

        // Back-solve the array power needed to cover 24h of load
        let combined_efficiency =
            array.derate_factor * array.mppt_efficiency * load.inverter_efficiency;
        let required_array_power_w = (daily_load_wh * load.safety_margin)
            / nonzero(array.peak_sun_hours * combined_efficiency);
        let recommended_panel_count =
            (required_array_power_w / nonzero(array.panel_rated_watts_w)).ceil() as u32;

        let battery_total_wh = battery.voltage_v * battery.amp_hours_ah;
        let battery_usable_wh =
            battery_total_wh * battery.depth_of_discharge * battery.round_trip_efficiency;
        let hours_from_battery = battery_usable_wh / nonzero(load.total_continuous_load_w);
        let recommended_battery_ah = (load.total_continuous_load_w * 24.0 * load.safety_margin)
            / nonzero(battery.voltage_v)
            / nonzero(battery.depth_of_discharge);

        let panel_rated_current_a = array.panel_rated_watts_w / nonzero(array.panel_voltage_v);
        let mppt_sufficient_for_one_panel = array.mppt_rated_current_a >= panel_rated_current_a;
        let inverter_sufficient = load.inverter_rated_w >= load.total_continuous_load_w;
        let array_sufficient_instant = total_ac_instant_w >= load.total_continuous_load_w;
        let array_sufficient_daily = daily_energy_wh_array >= daily_load_wh * load.safety_margin;
        let system_can_run_continuously = array_sufficient_daily && inverter_sufficient;

        let low_battery_risk = hours_from_battery < thresholds.low_battery_hours;
        let likely_grid_fallback_soon = hours_from_battery < thresholds.grid_fallback_hours;

        Self {
            sun_percent,
            panel_instant_w,
            after_derate_w,
            after_mppt_w,
            ac_per_panel_w,
            total_ac_instant_w,
            daily_energy_wh_array,
            daily_load_wh,
            combined_efficiency,
            required_array_power_w,
            recommended_panel_count,
            battery_total_wh,
            battery_usable_wh,
            hours_from_battery,
            recommended_battery_ah,
            panel_rated_current_a,
            mppt_sufficient_for_one_panel,
            inverter_sufficient,
            array_sufficient_instant,
            array_sufficient_daily,
            system_can_run_continuously,
            low_battery_risk,
            likely_grid_fallback_soon,
        }
    }
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report (sun {:.0}%) ---", self.sun_percent)?;
        writeln!(f, "Panel instantaneous:   {:.1} W", self.panel_instant_w)?;
        writeln!(f, "After derate:          {:.1} W", self.after_derate_w)?;
        writeln!(f, "After MPPT:            {:.1} W", self.after_mppt_w)?;
        writeln!(f, "AC per panel:          {:.1} W", self.ac_per_panel_w)?;
        writeln!(f, "Array AC now:          {:.1} W", self.total_ac_instant_w)?;
        writeln!(
            f,
            "Array daily yield:     {:.0} Wh/day",
            self.daily_energy_wh_array
        )?;
        writeln!(f, "Load daily need:       {:.0} Wh/day", self.daily_load_wh)?;
        writeln!(
            f,
            "Required array power:  {:.0} W ({} panel(s) recommended)",
            self.required_array_power_w, self.recommended_panel_count
        )?;
        writeln!(
            f,
            "Battery energy:        {:.0} Wh total, {:.0} Wh usable",
            self.battery_total_wh, self.battery_usable_wh
        )?;
        writeln!(
            f,
            "Battery autonomy:      {:.2} h ({:.1} Ah recommended for 24h)",
            self.hours_from_battery, self.recommended_battery_ah
        )?;
        writeln!(
            f,
            "Panel rated current:   {:.2} A (MPPT ok: {})",
            self.panel_rated_current_a, self.mppt_sufficient_for_one_panel
        )?;
        writeln!(
            f,
            "Inverter sufficient:   {}  Array instant: {}  Array daily: {}",
            self.inverter_sufficient, self.array_sufficient_instant, self.array_sufficient_daily
        )?;
        writeln!(
            f,
            "Continuous operation:  {}",
            self.system_can_run_continuously
        )?;
        write!(
            f,
            "Low battery risk: {}  Grid fallback likely: {}",
            self.low_battery_risk, self.likely_grid_fallback_soon
        )
    }
}
