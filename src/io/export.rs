//! CSV export for sun-sweep sizing results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::{ArraySpec, BatterySpec, LoadProfile, SizingReport, StatusThresholds};

/// Schema v1 column header for CSV sweep export.
const HEADER: &str = "sun_percent,panel_instant_w,ac_per_panel_w,total_ac_instant_w,\
                      daily_energy_wh_array,daily_load_wh,required_array_power_w,\
                      recommended_panel_count,battery_usable_wh,hours_from_battery,\
                      array_sufficient_instant,inverter_sufficient,system_can_run_continuously";

/// Evaluates the sizing model across evenly spaced sun percentages.
///
/// Returns `steps` reports from 0% to 100% inclusive. With the default
/// 101 steps each report lands on a whole percent.
///
/// # Panics
///
/// Panics if `steps < 2`.
pub fn sun_sweep(
    array: &ArraySpec,
    battery: &BatterySpec,
    load: &LoadProfile,
    thresholds: &StatusThresholds,
    steps: usize,
) -> Vec<SizingReport> {
    assert!(steps >= 2, "a sweep needs at least both endpoints");
    (0..steps)
        .map(|i| {
            let sun_percent = 100.0 * i as f32 / (steps - 1) as f32;
            SizingReport::compute(array, battery, load, sun_percent, thresholds)
        })
        .collect()
}

/// Exports sweep results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per report using the
/// schema v1 column layout. Produces deterministic output for identical
/// inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(reports: &[SizingReport], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(reports, buf)
}

/// Writes sweep results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(reports: &[SizingReport], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in reports {
        wtr.write_record(&[
            format!("{:.2}", r.sun_percent),
            format!("{:.4}", r.panel_instant_w),
            format!("{:.4}", r.ac_per_panel_w),
            format!("{:.4}", r.total_ac_instant_w),
            format!("{:.4}", r.daily_energy_wh_array),
            format!("{:.4}", r.daily_load_wh),
            format!("{:.4}", r.required_array_power_w),
            r.recommended_panel_count.to_string(),
            format!("{:.4}", r.battery_usable_wh),
            format!("{:.4}", r.hours_from_battery),
            r.array_sufficient_instant.to_string(),
            r.inverter_sufficient.to_string(),
            r.system_can_run_continuously.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
