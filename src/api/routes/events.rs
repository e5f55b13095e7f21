//! Event Log Routes
//!
//! - DELETE /api/v1/events - Remove every meal and mood
//! - POST /api/v1/seed - Replace the history with a week of demo data

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ClearResponse, SeedResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::seed::generate_seed_data;

/// DELETE /api/v1/events
pub async fn clear_events(State(state): State<Arc<AppState>>) -> ApiResult<Json<ClearResponse>> {
    let stats = state.store.stats().await;
    state.store.clear().await?;

    tracing::warn!(
        meals = stats.meal_count,
        moods = stats.mood_count,
        "Event history cleared via API"
    );

    Ok(Json(ClearResponse {
        status: "ok".to_string(),
        meals_removed: stats.meal_count,
        moods_removed: stats.mood_count,
    }))
}

/// POST /api/v1/seed
pub async fn seed_events(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedResponse>> {
    let (meals, moods) = generate_seed_data(state.engine.now(), state.engine.tz());
    let (meal_count, mood_count) = (meals.len(), moods.len());

    state.store.replace_all(meals, moods).await?;

    tracing::info!(meals = meal_count, moods = mood_count, "Seeded demo data");

    Ok(Json(SeedResponse {
        status: "ok".to_string(),
        meals: meal_count,
        moods: mood_count,
    }))
}
