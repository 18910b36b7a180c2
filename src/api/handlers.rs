//! Request handlers for the API endpoints.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ActivityRequest, ActivityResponse, ErrorResponse, ReportResponse, SweepQuery, SweepRecord,
};
use crate::activity::{ActivityEvent, classify_user_agent};

/// Returns the runtime summary and sizing report.
///
/// `GET /report` → 200 + `ReportResponse` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    Json(ReportResponse {
        summary: state.summary.clone(),
        report: state.report.clone(),
    })
}

/// Returns sweep records, optionally filtered by sun-percent range.
///
/// `GET /sweep` → 200 + `Vec<SweepRecord>` JSON
/// `GET /sweep?from=N&to=M` → filtered range (inclusive)
/// `GET /sweep?from=80&to=20` → 400 + `ErrorResponse`
pub async fn get_sweep(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SweepQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0.0);
    let to = query.to.unwrap_or(100.0);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<SweepRecord> = state
        .sweep
        .iter()
        .filter(|r| r.sun_percent >= from && r.sun_percent <= to)
        .map(SweepRecord::from)
        .collect();

    Ok(Json(records))
}

/// Inserts one activity event, classifying the caller's user-agent.
///
/// `POST /activity` `{message}` → 200 + `ActivityResponse`
/// Empty message → 400 + `ErrorResponse`
pub async fn post_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ActivityRequest>,
) -> impl IntoResponse {
    if request.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "`message` must not be empty".to_string(),
            }),
        ));
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let event = ActivityEvent {
        seq: state.next_seq.fetch_add(1, Ordering::Relaxed),
        message: request.message,
        client: classify_user_agent(user_agent),
    };

    if let Ok(mut activities) = state.activities.lock() {
        activities.push(event.clone());
    }

    Ok(Json(ActivityResponse {
        success: true,
        event,
    }))
}

/// Returns all recorded activity events, oldest first.
///
/// `GET /activity` → 200 + `Vec<ActivityEvent>` JSON
pub async fn get_activity(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityEvent>> {
    let events = state
        .activities
        .lock()
        .map(|a| a.clone())
        .unwrap_or_default();
    Json(events)
}
