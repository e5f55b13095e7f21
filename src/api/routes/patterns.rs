//! Pattern Routes
//!
//! - GET /api/v1/patterns?days=N - Every pattern the engine finds
//! - GET /api/v1/patterns/weekly - Gated, ranked weekly report

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{PatternListResponse, PatternParams};
use crate::api::error::ApiResult;
use crate::api::routes::validate_days;
use crate::api::state::AppState;
use crate::events::{EventSource, TimeWindow};
use crate::report::{build_weekly_report, WeeklyReport};

/// GET /api/v1/patterns
///
/// Runs all detectors without gating or truncation.
pub async fn list_patterns(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PatternParams>,
) -> ApiResult<Json<PatternListResponse>> {
    let window = validate_days(params.days)?
        .map(|days| TimeWindow::trailing_days(state.engine.now(), days));

    let (meals, moods) = match window {
        Some(w) => (
            state.store.meals_since(w.start).await,
            state.store.moods_since(w.start).await,
        ),
        None => (state.store.meals().await, state.store.moods().await),
    };

    let patterns = state.engine.run_concurrent(&meals, &moods).await;

    Ok(Json(PatternListResponse {
        total: patterns.len(),
        window,
        patterns,
    }))
}

/// GET /api/v1/patterns/weekly
pub async fn weekly_report(State(state): State<Arc<AppState>>) -> ApiResult<Json<WeeklyReport>> {
    let report =
        build_weekly_report(state.store.as_ref(), &state.engine, &state.gating_policy()).await;

    tracing::info!(
        status = ?report.status,
        shown = report.patterns.len(),
        detected = report.total_detected,
        "Weekly report built"
    );

    Ok(Json(report))
}
