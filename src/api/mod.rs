//! REST API for computed reports and the activity log.
//!
//! Provides four endpoints:
//! - `GET /report` — runtime summary and full sizing report
//! - `GET /sweep` — sun-sweep records with optional range filtering
//! - `POST /activity` — insert one activity event (the page logger's target)
//! - `GET /activity` — recorded activity events

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;

use axum::Router;
use axum::routing::{get, post};

use crate::activity::ActivityEvent;
use crate::engine::{RuntimeSummary, SizingReport};

/// Application state shared across all request handlers.
///
/// The computed reports are immutable after construction; only the
/// activity log mutates, so it alone sits behind a mutex.
pub struct AppState {
    /// Runtime summary for the loaded scenario.
    pub summary: RuntimeSummary,
    /// Sizing report at the scenario's sun percentage.
    pub report: SizingReport,
    /// Sweep records across the full sun range.
    pub sweep: Vec<SizingReport>,
    /// Recorded activity events, newest last.
    pub activities: Mutex<Vec<ActivityEvent>>,
    /// Sequence counter for inserted activity events.
    pub next_seq: AtomicU64,
}

impl AppState {
    /// Creates state with an empty activity log.
    pub fn new(summary: RuntimeSummary, report: SizingReport, sweep: Vec<SizingReport>) -> Self {
        Self {
            summary,
            report,
            sweep,
            activities: Mutex::new(Vec::new()),
            next_seq: AtomicU64::new(0),
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: std::sync::Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route("/sweep", get(handlers::get_sweep))
        .route(
            "/activity",
            post(handlers::post_activity).get(handlers::get_activity),
        )
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: std::sync::Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
