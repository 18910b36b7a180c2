#![cfg(feature = "api")]

//! End-to-end test of the API server over real HTTP.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

const SWEEP_KEYS: &[&str] = &[
    "sun_percent",
    "panel_instant_w",
    "ac_per_panel_w",
    "total_ac_instant_w",
    "daily_energy_wh_array",
    "daily_load_wh",
    "required_array_power_w",
    "recommended_panel_count",
    "battery_usable_wh",
    "hours_from_battery",
    "array_sufficient_instant",
    "inverter_sufficient",
    "system_can_run_continuously",
];

struct ChildGuard {
    child: Child,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn activity_log_is_flushed_before_serving_starts() {
    let mut path = std::env::temp_dir();
    path.push(format!("solar-sizer-api-log-{}.csv", std::process::id()));

    let port = allocate_port();
    let child = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args([
            "--serve",
            "--port",
            &port.to_string(),
            "--activity-log",
            path.to_str().expect("utf-8 temp path"),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("solar-sizer process should spawn");
    let _child = ChildGuard { child };
    wait_for_server(port, Duration::from_secs(8));

    // The server never exits; lifecycle rows must already be on disk.
    let content = std::fs::read_to_string(&path).expect("log should be readable");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "seq,message,browser,os,device");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Scenario loaded"));
    assert!(lines[2].contains("Report computed"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn api_serves_report_sweep_and_activity_over_http() {
    let port = allocate_port();
    let _child = spawn_server(port);
    wait_for_server(port, Duration::from_secs(8));

    // Report carries both the runtime summary and the sizing report
    let (status, body) = http_get(port, "/report").expect("/report request should succeed");
    assert_eq!(status, 200);
    let report: Value = serde_json::from_str(&body).expect("report body should be JSON");
    assert_eq!(
        report["summary"]["total_wattage_w"].as_f64(),
        Some(85.0),
        "baseline scenario draw"
    );
    assert!(report["report"]["system_can_run_continuously"].is_boolean());

    // Range-filtered sweep with the schema v1 keys on every record
    let (status, body) =
        http_get(port, "/sweep?from=58&to=62").expect("/sweep request should succeed");
    assert_eq!(status, 200);
    let sweep: Value = serde_json::from_str(&body).expect("sweep body should be JSON array");
    let rows = sweep.as_array().expect("sweep should be an array");
    assert_eq!(rows.len(), 5);
    for row in rows {
        let obj = row.as_object().expect("row should be an object");
        for key in SWEEP_KEYS {
            assert!(obj.contains_key(*key), "missing key: {key}");
        }
    }
    assert_eq!(rows[0]["sun_percent"].as_f64(), Some(58.0));
    assert_eq!(rows[4]["sun_percent"].as_f64(), Some(62.0));

    // Reversed range is rejected
    let (status, _) =
        http_get(port, "/sweep?from=90&to=10").expect("/sweep request should succeed");
    assert_eq!(status, 400);

    // Activity insert with a classified user-agent, then read back
    let (status, body) = http_post(
        port,
        "/activity",
        r#"{"message":"Page loaded"}"#,
        Some("Mozilla/5.0 (Windows NT 10.0) Chrome/126.0 Safari/537.36"),
    )
    .expect("POST /activity should succeed");
    assert_eq!(status, 200);
    let posted: Value = serde_json::from_str(&body).expect("activity body should be JSON");
    assert_eq!(posted["success"].as_bool(), Some(true));
    assert_eq!(posted["event"]["seq"].as_u64(), Some(0));
    assert_eq!(posted["event"]["client"]["browser"].as_str(), Some("Chrome"));

    let (status, body) = http_get(port, "/activity").expect("GET /activity should succeed");
    assert_eq!(status, 200);
    let events: Value = serde_json::from_str(&body).expect("activity list should be JSON");
    let events = events.as_array().expect("activity list should be an array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["message"].as_str(), Some("Page loaded"));
    assert_eq!(events[0]["client"]["os"].as_str(), Some("Windows"));
}

fn allocate_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    let port = listener
        .local_addr()
        .expect("local_addr should be available")
        .port();
    drop(listener);
    port
}

fn spawn_server(port: u16) -> ChildGuard {
    let child = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args(["--serve", "--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("solar-sizer process should spawn");

    ChildGuard { child }
}

fn wait_for_server(port: u16, timeout: Duration) {
    let start = Instant::now();
    loop {
        if let Ok((status, _)) = http_get(port, "/report") {
            if status == 200 {
                return;
            }
        }

        if start.elapsed() >= timeout {
            panic!("timed out waiting for API server on port {port}");
        }

        thread::sleep(Duration::from_millis(50));
    }
}

fn http_get(port: u16, path: &str) -> Result<(u16, String), String> {
    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\nConnection: close\r\n\r\n"
    );
    http_exchange(port, &request)
}

fn http_post(
    port: u16,
    path: &str,
    body: &str,
    user_agent: Option<&str>,
) -> Result<(u16, String), String> {
    let ua_header = user_agent
        .map(|ua| format!("User-Agent: {ua}\r\n"))
        .unwrap_or_default();
    let request = format!(
        "POST {path} HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\n{ua_header}\
         Content-Type: application/json\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    http_exchange(port, &request)
}

fn http_exchange(port: u16, request: &str) -> Result<(u16, String), String> {
    let mut stream =
        TcpStream::connect(("127.0.0.1", port)).map_err(|err| format!("connect: {err}"))?;
    stream
        .write_all(request.as_bytes())
        .map_err(|err| format!("write: {err}"))?;

    let mut raw = String::new();
    stream
        .read_to_string(&mut raw)
        .map_err(|err| format!("read: {err}"))?;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| "invalid HTTP response".to_string())?;
    let status_line = head
        .lines()
        .next()
        .ok_or_else(|| "missing status line".to_string())?;
    let status_code = status_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| "missing status code".to_string())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status code: {err}"))?;

    Ok((status_code, body.to_string()))
}
