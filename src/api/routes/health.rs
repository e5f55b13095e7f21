//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (store directory writable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_store_health(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store_ok = check_store_health(&state);
    let stats = state.store.stats().await;

    Json(HealthResponse {
        status: if store_ok { "healthy" } else { "degraded" }.to_string(),
        store: if store_ok { "ok" } else { "error" }.to_string(),
        meal_count: stats.meal_count,
        mood_count: stats.mood_count,
        skipped_records: stats.skipped_records,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// An in-memory store is always fine; a file store needs its directory
fn check_store_health(state: &AppState) -> bool {
    match state.store.path().and_then(|p| p.parent()) {
        None => true,
        Some(dir) if dir.as_os_str().is_empty() => true,
        Some(dir) => dir.is_dir(),
    }
}
