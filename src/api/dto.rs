//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Enum fields arrive as plain labels ("snack", "high_sugar") and are
//! validated by the route handlers.

use crate::events::{MealEvent, MoodEvent, TimeWindow};
use crate::patterns::Pattern;
use crate::reminders::Reminder;
use serde::{Deserialize, Serialize};

// ============================================
// MEAL DTOs
// ============================================

/// Meal create request
#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub meal_slot: String,
    /// RFC 3339, defaults to now
    #[serde(default)]
    pub occurred_at: Option<String>,
    /// Empty means `unknown`
    #[serde(default)]
    pub meal_type_tags: Vec<String>,
    #[serde(default)]
    pub photo_uri: Option<String>,
    #[serde(default)]
    pub text_description: Option<String>,
    #[serde(default)]
    pub portion_size: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Meal update request (only provided fields change)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealRequest {
    #[serde(default)]
    pub meal_slot: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub meal_type_tags: Option<Vec<String>>,
    #[serde(default)]
    pub text_description: Option<String>,
    #[serde(default)]
    pub portion_size: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A meal plus its one-line summary
#[derive(Debug, Serialize)]
pub struct MealResponse {
    #[serde(flatten)]
    pub meal: MealEvent,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub total: usize,
    pub meals: Vec<MealResponse>,
}

// ============================================
// MOOD DTOs
// ============================================

/// Mood create request
#[derive(Debug, Deserialize)]
pub struct CreateMoodRequest {
    pub valence: String,
    pub energy: String,
    pub stress: String,
    /// RFC 3339, defaults to now
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub linked_meal_event_id: Option<String>,
}

/// Mood update request (only provided fields change)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMoodRequest {
    #[serde(default)]
    pub valence: Option<String>,
    #[serde(default)]
    pub energy: Option<String>,
    #[serde(default)]
    pub stress: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoodListResponse {
    pub total: usize,
    pub moods: Vec<MoodEvent>,
}

/// Query parameters for list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only events from the last N days
    #[serde(default)]
    pub days: Option<i64>,
    /// Maximum number of events (newest first)
    #[serde(default)]
    pub limit: Option<usize>,
}

// ============================================
// EVENT LOG DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: String,
    pub meals_removed: usize,
    pub moods_removed: usize,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub status: String,
    pub meals: usize,
    pub moods: usize,
}

// ============================================
// PATTERN DTOs
// ============================================

/// Query parameters for the raw pattern run
#[derive(Debug, Default, Deserialize)]
pub struct PatternParams {
    /// Analyze only the last N days; omitted means the whole history
    #[serde(default)]
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PatternListResponse {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
    pub patterns: Vec<Pattern>,
}

// ============================================
// REMINDER DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    /// Offset the reminder times are expressed in
    pub utc_offset_minutes: i32,
    pub reminders: Vec<Reminder>,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// json or csv
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "json".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub store: String,
    pub meal_count: usize,
    pub mood_count: usize,
    pub skipped_records: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
