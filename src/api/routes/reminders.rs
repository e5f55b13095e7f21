//! Reminder Routes
//!
//! - GET /api/v1/reminders - Planned daily meal and mood reminder times

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::RemindersResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::events::EventSource;
use crate::reminders::plan_reminders;

/// GET /api/v1/reminders
pub async fn get_reminders(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RemindersResponse>> {
    let meals = state.store.all_meals().await;
    let tz = state.engine.tz();

    Ok(Json(RemindersResponse {
        utc_offset_minutes: tz.local_minus_utc() / 60,
        reminders: plan_reminders(&meals, tz),
    }))
}
