//! Shared test fixtures for integration tests.

use solar_sizer::config::ScenarioConfig;
use solar_sizer::engine::{
    ArraySpec, BatterySpec, LoadBank, LoadProfile, SizingReport, StatusThresholds,
};

/// Baseline scenario config (500 Wh, LED lamp x2 + laptop, 60% sun).
pub fn baseline_config() -> ScenarioConfig {
    ScenarioConfig::baseline()
}

/// Reference array: five 400 W / 36 V panels, 0.85 derate, 5 peak sun
/// hours, 15 A MPPT at 97% efficiency.
pub fn reference_array() -> ArraySpec {
    ArraySpec {
        panel_rated_watts_w: 400.0,
        panel_voltage_v: 36.0,
        panel_count: 5,
        derate_factor: 0.85,
        peak_sun_hours: 5.0,
        mppt_rated_current_a: 15.0,
        mppt_efficiency: 0.97,
    }
}

/// Reference battery: 48 V, 100 Ah, 90% round trip, 80% DoD.
pub fn reference_battery() -> BatterySpec {
    BatterySpec {
        voltage_v: 48.0,
        amp_hours_ah: 100.0,
        round_trip_efficiency: 0.9,
        depth_of_discharge: 0.8,
    }
}

/// Reference load: 150 W continuous through a 90% efficient 2 kW
/// inverter with a 1.1 safety margin.
pub fn reference_load() -> LoadProfile {
    LoadProfile {
        total_continuous_load_w: 150.0,
        inverter_efficiency: 0.9,
        inverter_rated_w: 2000.0,
        safety_margin: 1.1,
    }
}

/// Full sizing report for the reference scenario at the given sun level.
pub fn reference_report(sun_percent: f32) -> SizingReport {
    SizingReport::compute(
        &reference_array(),
        &reference_battery(),
        &reference_load(),
        sun_percent,
        &StatusThresholds::default(),
    )
}

/// Load bank matching the baseline runtime scenario: 85 W selected draw.
pub fn baseline_bank() -> LoadBank {
    let mut bank = LoadBank::new();
    bank.add("LED lamp", 10.0, 2);
    bank.add("Laptop", 65.0, 1);
    bank
}
