//! Mood Routes
//!
//! - GET /api/v1/moods - List moods (newest first)
//! - POST /api/v1/moods - Log a mood
//! - GET /api/v1/moods/:id - Get a mood
//! - PUT /api/v1/moods/:id - Edit a mood
//! - DELETE /api/v1/moods/:id - Delete a mood

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{CreateMoodRequest, ListParams, MoodListResponse, UpdateMoodRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::{parse_field, parse_timestamp, validate_days};
use crate::api::state::AppState;
use crate::events::{EventSource, MoodEvent, TimeWindow};

/// GET /api/v1/moods
pub async fn list_moods(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<MoodListResponse>> {
    let mut moods = match validate_days(params.days)? {
        Some(days) => {
            state
                .store
                .moods_since(TimeWindow::trailing_days(Utc::now(), days).start)
                .await
        }
        None => state.store.moods().await,
    };

    if let Some(limit) = params.limit {
        moods.truncate(limit);
    }

    Ok(Json(MoodListResponse {
        total: moods.len(),
        moods,
    }))
}

/// GET /api/v1/moods/:id
pub async fn get_mood(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MoodEvent>> {
    state
        .store
        .get_mood(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Mood {} not found", id)))
}

/// POST /api/v1/moods
pub async fn create_mood(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMoodRequest>,
) -> ApiResult<(StatusCode, Json<MoodEvent>)> {
    let now = Utc::now();
    let valence = parse_field("valence", &req.valence)?;
    let energy = parse_field("energy", &req.energy)?;
    let stress = parse_field("stress", &req.stress)?;
    let occurred_at = parse_timestamp(req.occurred_at.as_deref(), now)?;

    let mut mood = MoodEvent::new(valence, energy, stress, occurred_at).created_at(now);
    if let Some(tag) = req.tag {
        mood = mood.tag(parse_field("tag", &tag)?);
    }
    if let Some(notes) = req.notes {
        mood = mood.notes(notes);
    }
    if let Some(meal_id) = req.linked_meal_event_id {
        if state.store.get_meal(&meal_id).await.is_none() {
            return Err(ApiError::Validation(format!(
                "linked meal {} does not exist",
                meal_id
            )));
        }
        mood = mood.linked_meal(meal_id);
    }

    state.store.add_mood(mood.clone()).await?;

    tracing::info!(mood_id = %mood.id, dip = mood.is_dip(), "Logged mood");

    Ok((StatusCode::CREATED, Json(mood)))
}

/// PUT /api/v1/moods/:id
pub async fn update_mood(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMoodRequest>,
) -> ApiResult<Json<MoodEvent>> {
    let mut mood = state
        .store
        .get_mood(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Mood {} not found", id)))?;

    if let Some(valence) = req.valence {
        mood.valence = parse_field("valence", &valence)?;
    }
    if let Some(energy) = req.energy {
        mood.energy = parse_field("energy", &energy)?;
    }
    if let Some(stress) = req.stress {
        mood.stress = parse_field("stress", &stress)?;
    }
    if let Some(at) = req.occurred_at {
        mood.occurred_at = parse_timestamp(Some(&at), mood.occurred_at)?;
    }
    if let Some(tag) = req.tag {
        mood.tag = Some(parse_field("tag", &tag)?);
    }
    if let Some(notes) = req.notes {
        mood.notes = Some(notes);
    }

    state.store.update_mood(mood.clone()).await?;

    tracing::info!(mood_id = %id, "Updated mood");

    Ok(Json(mood))
}

/// DELETE /api/v1/moods/:id
pub async fn delete_mood(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_mood(&id).await?;

    tracing::info!(mood_id = %id, "Deleted mood");

    Ok(StatusCode::NO_CONTENT)
}
