//! solar-sizer entry point — CLI wiring and config-driven report computation.

use std::path::Path;
use std::process;
use std::time::Duration;

use solar_sizer::activity::{ActivityRecorder, CsvSink};
use solar_sizer::config::ScenarioConfig;
use solar_sizer::engine::{SizingReport, compute_summary, format_hours};
use solar_sizer::io::export::{export_csv, sun_sweep};

/// Number of sweep points: one per whole sun percent, endpoints included.
const SWEEP_STEPS: usize = 101;

/// How long to wait for the activity log to drain on exit.
const ACTIVITY_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    sun_override: Option<f32>,
    sweep_out: Option<String>,
    activity_log: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("solar-sizer — portable solar runtime and array sizing estimator");
    eprintln!();
    eprintln!("Usage: solar-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --sun <0-100>            Override the sun percentage");
    eprintln!("  --sweep-out <path>       Export a full sun sweep to CSV");
    eprintln!("  --activity-log <path>    Append run lifecycle events to a CSV log");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after computing");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        sun_override: None,
        sweep_out: None,
        activity_log: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--sun" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --sun requires a percentage argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<f32>() {
                    cli.sun_override = Some(s);
                } else {
                    eprintln!("error: --sun value \"{}\" is not a number", args[i]);
                    process::exit(1);
                }
            }
            "--sweep-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --sweep-out requires a path argument");
                    process::exit(1);
                }
                cli.sweep_out = Some(args[i].clone());
            }
            "--activity-log" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --activity-log requires a path argument");
                    process::exit(1);
                }
                cli.activity_log = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Opens the lifecycle activity log if one was requested.
fn open_activity_log(path: &str) -> Option<ActivityRecorder> {
    match std::fs::File::create(path) {
        Ok(file) => match CsvSink::new(file) {
            Ok(sink) => Some(ActivityRecorder::spawn(Box::new(sink))),
            Err(e) => {
                eprintln!("warning: cannot start activity log: {e}");
                None
            }
        },
        Err(e) => {
            eprintln!("warning: cannot create \"{path}\": {e}");
            None
        }
    }
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply sun override
    if let Some(sun) = cli.sun_override {
        scenario.conditions.sun_percent = sun;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let recorder = cli.activity_log.as_deref().and_then(open_activity_log);
    if let Some(ref rec) = recorder {
        let source = cli
            .scenario_path
            .clone()
            .or_else(|| cli.preset.clone())
            .unwrap_or_else(|| "baseline".to_string());
        rec.record(format!("Scenario loaded: {source}"));
    }

    // Compute
    let bank = scenario.load_bank();
    let summary = compute_summary(scenario.runtime.capacity_wh, bank.items());
    let array = scenario.array_spec();
    let battery = scenario.battery_spec();
    let load_profile = scenario.load_profile();
    let thresholds = scenario.status_thresholds();
    let report = SizingReport::compute(
        &array,
        &battery,
        &load_profile,
        scenario.conditions.sun_percent,
        &thresholds,
    );

    if let Some(ref rec) = recorder {
        rec.record(format!(
            "Report computed at {:.0}% sun",
            scenario.conditions.sun_percent
        ));
    }

    // Print the simple-calculator summary
    println!("--- Run Time Estimate ---");
    println!(
        "Total draw:        {:.0} W ({} of {} loads selected)",
        summary.total_wattage_w,
        bank.selected_count(),
        bank.len()
    );
    println!("Battery capacity:  {:.0} Wh", scenario.runtime.capacity_wh);
    println!("Estimated run time: {}", format_hours(summary.runtime_hours));
    println!();

    // Print the sizing report
    println!("{report}");

    // Export sweep CSV if requested
    if let Some(ref path) = cli.sweep_out {
        let sweep = sun_sweep(&array, &battery, &load_profile, &thresholds, SWEEP_STEPS);
        if let Err(e) = export_csv(&sweep, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Sweep written to {path}");
        if let Some(ref rec) = recorder {
            rec.record(format!("Sweep exported: {path}"));
        }
    }

    // Drain the activity log before serving; the serve loop never returns
    if let Some(rec) = recorder {
        rec.flush(ACTIVITY_FLUSH_TIMEOUT);
        rec.shutdown();
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let sweep = sun_sweep(&array, &battery, &load_profile, &thresholds, SWEEP_STEPS);
        let state = Arc::new(solar_sizer::api::AppState::new(summary, report, sweep));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(solar_sizer::api::serve(state, addr));
    }
}
