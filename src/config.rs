//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine::{ArraySpec, BatterySpec, LoadBank, LoadItem, LoadProfile, StatusThresholds};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simple-calculator inputs: battery capacity and the load list.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Solar array and MPPT parameters.
    #[serde(default)]
    pub array: ArrayConfig,
    /// Battery bank parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Continuous load and inverter parameters.
    #[serde(default)]
    pub load_profile: LoadProfileConfig,
    /// Battery-autonomy status thresholds.
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// Ambient conditions the instantaneous figures are evaluated at.
    #[serde(default)]
    pub conditions: ConditionsConfig,
}

/// Simple-calculator inputs: battery capacity and the load list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Battery capacity (Wh).
    pub capacity_wh: f32,
    /// Appliance loads counted toward the total draw.
    pub loads: Vec<LoadEntry>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            capacity_wh: 500.0,
            loads: vec![
                LoadEntry {
                    name: "LED lamp".to_string(),
                    wattage_w: 10.0,
                    quantity: 2,
                    selected: true,
                },
                LoadEntry {
                    name: "Laptop".to_string(),
                    wattage_w: 65.0,
                    quantity: 1,
                    selected: true,
                },
            ],
        }
    }
}

/// One appliance entry in a scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadEntry {
    /// Display label.
    pub name: String,
    /// Power draw of one unit (W).
    pub wattage_w: f32,
    /// Number of units.
    pub quantity: u32,
    /// Whether the entry counts toward the total draw.
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

/// Solar array and MPPT parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Nameplate rating of one panel (W).
    pub panel_rated_watts_w: f32,
    /// Panel operating voltage (V).
    pub panel_voltage_v: f32,
    /// Number of panels installed.
    pub panel_count: u32,
    /// Derate factor for soiling/mismatch/temperature (0-1).
    pub derate_factor: f32,
    /// Equivalent full-sun hours per day.
    pub peak_sun_hours: f32,
    /// MPPT current rating (A).
    pub mppt_rated_current_a: f32,
    /// MPPT conversion efficiency (0-1).
    pub mppt_efficiency: f32,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            panel_rated_watts_w: 400.0,
            panel_voltage_v: 36.0,
            panel_count: 5,
            derate_factor: 0.85,
            peak_sun_hours: 5.0,
            mppt_rated_current_a: 15.0,
            mppt_efficiency: 0.97,
        }
    }
}

/// Battery bank parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// System voltage (V).
    pub voltage_v: f32,
    /// Rated capacity (Ah).
    pub amp_hours_ah: f32,
    /// Round-trip efficiency (0-1).
    pub round_trip_efficiency: f32,
    /// Usable fraction of rated capacity (0-1).
    pub depth_of_discharge: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            voltage_v: 48.0,
            amp_hours_ah: 100.0,
            round_trip_efficiency: 0.9,
            depth_of_discharge: 0.8,
        }
    }
}

/// Continuous load and inverter parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadProfileConfig {
    /// Total continuous AC load (W).
    pub total_continuous_load_w: f32,
    /// Inverter DC-to-AC efficiency (0-1).
    pub inverter_efficiency: f32,
    /// Maximum continuous inverter output (W).
    pub inverter_rated_w: f32,
    /// Oversizing multiplier (>= 1).
    pub safety_margin: f32,
}

impl Default for LoadProfileConfig {
    fn default() -> Self {
        Self {
            total_continuous_load_w: 150.0,
            inverter_efficiency: 0.9,
            inverter_rated_w: 2000.0,
            safety_margin: 1.1,
        }
    }
}

/// Battery-autonomy status thresholds (hours).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdsConfig {
    /// Autonomy below this flags low-battery risk.
    pub low_battery_hours: f32,
    /// Autonomy below this flags likely grid fallback.
    pub grid_fallback_hours: f32,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            low_battery_hours: 2.0,
            grid_fallback_hours: 1.0,
        }
    }
}

/// Ambient conditions the instantaneous figures are evaluated at.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConditionsConfig {
    /// Sun level as a percentage of full rated sun (0-100).
    pub sun_percent: f32,
}

impl Default for ConditionsConfig {
    fn default() -> Self {
        Self { sun_percent: 60.0 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"array.derate_factor"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (the product's shipped defaults).
    pub fn baseline() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            array: ArrayConfig::default(),
            battery: BatteryConfig::default(),
            load_profile: LoadProfileConfig::default(),
            thresholds: ThresholdsConfig::default(),
            conditions: ConditionsConfig::default(),
        }
    }

    /// Returns the off-grid-cabin preset: bigger bank, heavier loads.
    pub fn off_grid_cabin() -> Self {
        Self {
            runtime: RuntimeConfig {
                capacity_wh: 2048.0,
                loads: vec![
                    LoadEntry {
                        name: "Fridge".to_string(),
                        wattage_w: 80.0,
                        quantity: 1,
                        selected: true,
                    },
                    LoadEntry {
                        name: "Lights".to_string(),
                        wattage_w: 10.0,
                        quantity: 4,
                        selected: true,
                    },
                    LoadEntry {
                        name: "Laptop".to_string(),
                        wattage_w: 65.0,
                        quantity: 1,
                        selected: true,
                    },
                ],
            },
            array: ArrayConfig {
                panel_count: 4,
                peak_sun_hours: 4.5,
                ..ArrayConfig::default()
            },
            battery: BatteryConfig {
                amp_hours_ah: 200.0,
                ..BatteryConfig::default()
            },
            load_profile: LoadProfileConfig {
                total_continuous_load_w: 350.0,
                safety_margin: 1.25,
                ..LoadProfileConfig::default()
            },
            thresholds: ThresholdsConfig::default(),
            conditions: ConditionsConfig { sun_percent: 70.0 },
        }
    }

    /// Returns the van-build preset: 12 V system, small panels, light loads.
    pub fn van_build() -> Self {
        Self {
            runtime: RuntimeConfig {
                capacity_wh: 1024.0,
                loads: vec![
                    LoadEntry {
                        name: "Compressor fridge".to_string(),
                        wattage_w: 45.0,
                        quantity: 1,
                        selected: true,
                    },
                    LoadEntry {
                        name: "Vent fan".to_string(),
                        wattage_w: 30.0,
                        quantity: 2,
                        selected: true,
                    },
                    LoadEntry {
                        name: "Phone charger".to_string(),
                        wattage_w: 10.0,
                        quantity: 2,
                        selected: true,
                    },
                ],
            },
            array: ArrayConfig {
                panel_rated_watts_w: 200.0,
                panel_voltage_v: 20.0,
                panel_count: 2,
                derate_factor: 0.8,
                peak_sun_hours: 4.0,
                mppt_rated_current_a: 20.0,
                mppt_efficiency: 0.96,
            },
            battery: BatteryConfig {
                voltage_v: 12.8,
                amp_hours_ah: 200.0,
                round_trip_efficiency: 0.95,
                depth_of_discharge: 0.9,
            },
            load_profile: LoadProfileConfig {
                total_continuous_load_w: 120.0,
                inverter_efficiency: 0.88,
                inverter_rated_w: 1000.0,
                safety_margin: 1.2,
            },
            thresholds: ThresholdsConfig::default(),
            conditions: ConditionsConfig { sun_percent: 50.0 },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "off_grid_cabin", "van_build"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "off_grid_cabin" => Ok(Self::off_grid_cabin()),
            "van_build" => Ok(Self::van_build()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. The engine itself
    /// never validates; every value must pass through here (or the
    /// [`crate::input`] parsers) first.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let r = &self.runtime;
        if !(r.capacity_wh >= 0.0) || !r.capacity_wh.is_finite() {
            errors.push(ConfigError {
                field: "runtime.capacity_wh".into(),
                message: "must be a finite number >= 0".into(),
            });
        }
        for (i, load) in r.loads.iter().enumerate() {
            if load.name.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("runtime.loads[{i}].name"),
                    message: "must not be empty".into(),
                });
            }
            if !(load.wattage_w > 0.0) {
                errors.push(ConfigError {
                    field: format!("runtime.loads[{i}].wattage_w"),
                    message: "must be > 0".into(),
                });
            }
            if load.quantity < 1 {
                errors.push(ConfigError {
                    field: format!("runtime.loads[{i}].quantity"),
                    message: "must be >= 1".into(),
                });
            }
        }

        let a = &self.array;
        if a.panel_rated_watts_w < 0.0 {
            errors.push(ConfigError {
                field: "array.panel_rated_watts_w".into(),
                message: "must be >= 0".into(),
            });
        }
        if a.panel_voltage_v < 0.0 {
            errors.push(ConfigError {
                field: "array.panel_voltage_v".into(),
                message: "must be >= 0".into(),
            });
        }
        if a.peak_sun_hours < 0.0 {
            errors.push(ConfigError {
                field: "array.peak_sun_hours".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&a.derate_factor) {
            errors.push(ConfigError {
                field: "array.derate_factor".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(0.0..=1.0).contains(&a.mppt_efficiency) {
            errors.push(ConfigError {
                field: "array.mppt_efficiency".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if a.mppt_rated_current_a < 0.0 {
            errors.push(ConfigError {
                field: "array.mppt_rated_current_a".into(),
                message: "must be >= 0".into(),
            });
        }

        let b = &self.battery;
        if b.voltage_v < 0.0 {
            errors.push(ConfigError {
                field: "battery.voltage_v".into(),
                message: "must be >= 0".into(),
            });
        }
        if b.amp_hours_ah < 0.0 {
            errors.push(ConfigError {
                field: "battery.amp_hours_ah".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&b.round_trip_efficiency) {
            errors.push(ConfigError {
                field: "battery.round_trip_efficiency".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(0.0..=1.0).contains(&b.depth_of_discharge) {
            errors.push(ConfigError {
                field: "battery.depth_of_discharge".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let l = &self.load_profile;
        if l.total_continuous_load_w < 0.0 {
            errors.push(ConfigError {
                field: "load_profile.total_continuous_load_w".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&l.inverter_efficiency) {
            errors.push(ConfigError {
                field: "load_profile.inverter_efficiency".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if l.inverter_rated_w < 0.0 {
            errors.push(ConfigError {
                field: "load_profile.inverter_rated_w".into(),
                message: "must be >= 0".into(),
            });
        }
        if l.safety_margin < 1.0 {
            errors.push(ConfigError {
                field: "load_profile.safety_margin".into(),
                message: "must be >= 1.0".into(),
            });
        }

        let t = &self.thresholds;
        if t.low_battery_hours < 0.0 {
            errors.push(ConfigError {
                field: "thresholds.low_battery_hours".into(),
                message: "must be >= 0".into(),
            });
        }
        if t.grid_fallback_hours < 0.0 {
            errors.push(ConfigError {
                field: "thresholds.grid_fallback_hours".into(),
                message: "must be >= 0".into(),
            });
        }

        if !(0.0..=100.0).contains(&self.conditions.sun_percent) {
            errors.push(ConfigError {
                field: "conditions.sun_percent".into(),
                message: "must be in [0.0, 100.0]".into(),
            });
        }

        errors
    }

    /// Builds the engine's array spec from this configuration.
    pub fn array_spec(&self) -> ArraySpec {
        let a = &self.array;
        ArraySpec {
            panel_rated_watts_w: a.panel_rated_watts_w,
            panel_voltage_v: a.panel_voltage_v,
            panel_count: a.panel_count,
            derate_factor: a.derate_factor,
            peak_sun_hours: a.peak_sun_hours,
            mppt_rated_current_a: a.mppt_rated_current_a,
            mppt_efficiency: a.mppt_efficiency,
        }
    }

    /// Builds the engine's battery spec from this configuration.
    pub fn battery_spec(&self) -> BatterySpec {
        let b = &self.battery;
        BatterySpec {
            voltage_v: b.voltage_v,
            amp_hours_ah: b.amp_hours_ah,
            round_trip_efficiency: b.round_trip_efficiency,
            depth_of_discharge: b.depth_of_discharge,
        }
    }

    /// Builds the engine's load profile from this configuration.
    pub fn load_profile(&self) -> LoadProfile {
        let l = &self.load_profile;
        LoadProfile {
            total_continuous_load_w: l.total_continuous_load_w,
            inverter_efficiency: l.inverter_efficiency,
            inverter_rated_w: l.inverter_rated_w,
            safety_margin: l.safety_margin,
        }
    }

    /// Builds the engine's status thresholds from this configuration.
    pub fn status_thresholds(&self) -> StatusThresholds {
        StatusThresholds {
            low_battery_hours: self.thresholds.low_battery_hours,
            grid_fallback_hours: self.thresholds.grid_fallback_hours,
        }
    }

    /// Builds a load bank from the configured entries.
    ///
    /// Entries get creation-order ids. Call only after [`Self::validate`]
    /// reported no errors; the entries are taken as-is.
    pub fn load_bank(&self) -> LoadBank {
        let items = self
            .runtime
            .loads
            .iter()
            .enumerate()
            .map(|(i, e)| LoadItem {
                id: i as u64,
                name: e.name.clone(),
                wattage_w: e.wattage_w,
                quantity: e.quantity,
                selected: e.selected,
            })
            .collect();
        LoadBank::from_items(items)
    }
}
