//! Meal Routes
//!
//! CRUD endpoints for logged meals.
//!
//! - GET /api/v1/meals - List meals (newest first)
//! - POST /api/v1/meals - Log a meal
//! - GET /api/v1/meals/:id - Get a meal
//! - PUT /api/v1/meals/:id - Edit a meal
//! - DELETE /api/v1/meals/:id - Delete a meal

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{
    CreateMealRequest, ListParams, MealListResponse, MealResponse, UpdateMealRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::{parse_field, parse_timestamp, validate_days};
use crate::api::state::AppState;
use crate::events::{normalize_tags, EventSource, MealEvent, MealTag, PortionSize, TimeWindow};
use crate::summary::format_meal_summary;

fn to_response(meal: MealEvent) -> MealResponse {
    MealResponse {
        summary: format_meal_summary(&meal),
        meal,
    }
}

fn parse_tags(tags: &[String]) -> ApiResult<Vec<MealTag>> {
    let parsed = tags
        .iter()
        .map(|t| parse_field("meal_type_tags", t))
        .collect::<ApiResult<Vec<MealTag>>>()?;
    Ok(normalize_tags(parsed))
}

/// GET /api/v1/meals
pub async fn list_meals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<MealListResponse>> {
    let mut meals = match validate_days(params.days)? {
        Some(days) => {
            state
                .store
                .meals_since(TimeWindow::trailing_days(Utc::now(), days).start)
                .await
        }
        None => state.store.meals().await,
    };

    if let Some(limit) = params.limit {
        meals.truncate(limit);
    }

    let meals: Vec<MealResponse> = meals.into_iter().map(to_response).collect();

    Ok(Json(MealListResponse {
        total: meals.len(),
        meals,
    }))
}

/// GET /api/v1/meals/:id
pub async fn get_meal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MealResponse>> {
    let meal = state
        .store
        .get_meal(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Meal {} not found", id)))?;

    Ok(Json(to_response(meal)))
}

/// POST /api/v1/meals
pub async fn create_meal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMealRequest>,
) -> ApiResult<(StatusCode, Json<MealResponse>)> {
    let now = Utc::now();
    let slot = parse_field("meal_slot", &req.meal_slot)?;
    let occurred_at = parse_timestamp(req.occurred_at.as_deref(), now)?;
    let tags = parse_tags(&req.meal_type_tags)?;

    let mut meal = MealEvent::new(slot, occurred_at, tags).created_at(now);
    if let Some(uri) = req.photo_uri {
        meal = meal.photo(uri);
    }
    if let Some(text) = req.text_description {
        meal = meal.description(text);
    }
    if let Some(portion) = req.portion_size {
        meal = meal.portion(parse_field::<PortionSize>("portion_size", &portion)?);
    }
    if let Some(notes) = req.notes {
        meal = meal.notes(notes);
    }

    state.store.add_meal(meal.clone()).await?;

    tracing::info!(meal_id = %meal.id, slot = %meal.meal_slot, "Logged meal");

    Ok((StatusCode::CREATED, Json(to_response(meal))))
}

/// PUT /api/v1/meals/:id
pub async fn update_meal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMealRequest>,
) -> ApiResult<Json<MealResponse>> {
    let mut meal = state
        .store
        .get_meal(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Meal {} not found", id)))?;

    if let Some(slot) = req.meal_slot {
        meal.meal_slot = parse_field("meal_slot", &slot)?;
    }
    if let Some(at) = req.occurred_at {
        meal.occurred_at = parse_timestamp(Some(&at), meal.occurred_at)?;
    }
    if let Some(tags) = req.meal_type_tags {
        meal.meal_type_tags = parse_tags(&tags)?;
    }
    if let Some(text) = req.text_description {
        meal.text_description = Some(text);
    }
    if let Some(portion) = req.portion_size {
        meal.portion_size = Some(parse_field("portion_size", &portion)?);
    }
    if let Some(notes) = req.notes {
        meal.notes = Some(notes);
    }

    state.store.update_meal(meal.clone()).await?;

    tracing::info!(meal_id = %id, "Updated meal");

    Ok(Json(to_response(meal)))
}

/// DELETE /api/v1/meals/:id
pub async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_meal(&id).await?;

    tracing::info!(meal_id = %id, "Deleted meal");

    Ok(StatusCode::NO_CONTENT)
}
