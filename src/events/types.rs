//! Core data types for the meal & mood event log
//!
//! This module defines the records the journal stores and the analysis reads:
//! - `MealEvent`: One logged meal, with its slot and meal-type tags
//! - `MoodEvent`: One mood check-in (valence, energy, stress)
//! - `TimeWindow`: A half-open time interval for window queries
//!
//! All timestamps are UTC instants. Local-time classification (hour of day,
//! weekday, calendar date) always goes through an explicit `FixedOffset`.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Which meal of the day an entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the meal was captured
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Photo,
    #[default]
    Text,
}

/// Rough portion size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortionSize {
    Small,
    Medium,
    Large,
}

/// Meal-type tag vocabulary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealTag {
    // Base load
    Light,
    Regular,
    Heavy,
    // Craving
    Sweet,
    Savory,
    // Source
    Homemade,
    Restaurant,
    Packaged,
    // Impact
    HighSugar,
    FriedGreasy,
    HighProtein,
    HighFiber,
    Caffeinated,
    /// Fallback when nothing else was selected
    Unknown,
}

impl MealTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealTag::Light => "light",
            MealTag::Regular => "regular",
            MealTag::Heavy => "heavy",
            MealTag::Sweet => "sweet",
            MealTag::Savory => "savory",
            MealTag::Homemade => "homemade",
            MealTag::Restaurant => "restaurant",
            MealTag::Packaged => "packaged",
            MealTag::HighSugar => "high_sugar",
            MealTag::FriedGreasy => "fried_greasy",
            MealTag::HighProtein => "high_protein",
            MealTag::HighFiber => "high_fiber",
            MealTag::Caffeinated => "caffeinated",
            MealTag::Unknown => "unknown",
        }
    }

    /// Tag name with underscores replaced by spaces ("high_sugar" -> "high sugar")
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Base-load tags describe how big the meal was
    pub fn is_base_load(&self) -> bool {
        matches!(self, MealTag::Light | MealTag::Regular | MealTag::Heavy)
    }
}

impl std::fmt::Display for MealTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace an empty tag list with the `unknown` sentinel
pub fn normalize_tags(tags: Vec<MealTag>) -> Vec<MealTag> {
    if tags.is_empty() {
        vec![MealTag::Unknown]
    } else {
        tags
    }
}

fn default_tags() -> Vec<MealTag> {
    vec![MealTag::Unknown]
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<MealTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<MealTag>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(normalize_tags(tags))
}

/// A single logged meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealEvent {
    pub id: String,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// When the meal happened (the analytic time axis)
    pub occurred_at: DateTime<Utc>,
    pub meal_slot: MealSlot,
    #[serde(default)]
    pub input_mode: InputMode,
    /// Never empty; falls back to `[unknown]`
    #[serde(default = "default_tags", deserialize_with = "deserialize_tags")]
    pub meal_type_tags: Vec<MealTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion_size: Option<PortionSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MealEvent {
    /// Create a new meal entry with a fresh id, written now
    pub fn new(meal_slot: MealSlot, occurred_at: DateTime<Utc>, tags: Vec<MealTag>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            occurred_at,
            meal_slot,
            input_mode: InputMode::Text,
            meal_type_tags: normalize_tags(tags),
            photo_uri: None,
            text_description: None,
            portion_size: None,
            notes: None,
        }
    }

    /// Builder: set id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder: set creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builder: set a free-text description (text input mode)
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.input_mode = InputMode::Text;
        self.text_description = Some(text.into());
        self
    }

    /// Builder: attach a photo reference (photo input mode)
    pub fn photo(mut self, uri: impl Into<String>) -> Self {
        self.input_mode = InputMode::Photo;
        self.photo_uri = Some(uri.into());
        self
    }

    /// Builder: set portion size
    pub fn portion(mut self, size: PortionSize) -> Self {
        self.portion_size = Some(size);
        self
    }

    /// Builder: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn has_tag(&self, tag: MealTag) -> bool {
        self.meal_type_tags.contains(&tag)
    }

    /// Occurrence time in the given offset
    pub fn local_time(&self, tz: FixedOffset) -> DateTime<FixedOffset> {
        self.occurred_at.with_timezone(&tz)
    }
}

/// Emotional valence of a mood check-in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Valence {
    Negative,
    Neutral,
    Positive,
}

/// Energy level of a mood check-in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    Low,
    Ok,
    High,
}

/// Stress level of a mood check-in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stress {
    Low,
    Medium,
    High,
}

/// Optional descriptive tag for a mood
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoodTag {
    Anxious,
    Bored,
    Sad,
    Angry,
    Lonely,
    Celebratory,
}

/// A single mood check-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEvent {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
    pub valence: Valence,
    pub energy: Energy,
    pub stress: Stress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<MoodTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set when the mood was explicitly attached to a meal at logging time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_meal_event_id: Option<String>,
}

impl MoodEvent {
    /// Create a new mood entry with a fresh id, written now
    pub fn new(
        valence: Valence,
        energy: Energy,
        stress: Stress,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            occurred_at,
            valence,
            energy,
            stress,
            tag: None,
            notes: None,
            linked_meal_event_id: None,
        }
    }

    /// Builder: set id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder: set creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builder: set descriptive tag
    pub fn tag(mut self, tag: MoodTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Builder: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder: link to the meal this mood was logged against
    pub fn linked_meal(mut self, meal_id: impl Into<String>) -> Self {
        self.linked_meal_event_id = Some(meal_id.into());
        self
    }

    /// Negative valence or high stress
    pub fn is_dip(&self) -> bool {
        self.valence == Valence::Negative || self.stress == Stress::High
    }
}

/// Parse a snake_case label into one of the enums above ("high_sugar", "snack", ...)
pub fn parse_label<T: DeserializeOwned>(label: &str) -> Result<T, String> {
    let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("Unknown value: {}", label))
}

/// Time window for queries (half-open interval: [start, end))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    /// Start (inclusive)
    pub start: DateTime<Utc>,
    /// End (exclusive)
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, returning None if start >= end
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// The N days ending at `now`
    ///
    /// Saturates at the earliest representable instant.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        let start = Duration::try_days(days)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Like `contains`, but the end instant itself is included
    pub fn contains_inclusive(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_tags_fall_back_to_unknown() {
        let meal = MealEvent::new(MealSlot::Lunch, Utc::now(), vec![]);
        assert_eq!(meal.meal_type_tags, vec![MealTag::Unknown]);
    }

    #[test]
    fn test_deserialize_missing_or_empty_tags() {
        let json = r#"{
            "id": "m1",
            "created_at": "2024-01-15T12:00:00Z",
            "occurred_at": "2024-01-15T12:00:00Z",
            "meal_slot": "lunch",
            "meal_type_tags": []
        }"#;
        let meal: MealEvent = serde_json::from_str(json).unwrap();
        assert_eq!(meal.meal_type_tags, vec![MealTag::Unknown]);
        assert_eq!(meal.input_mode, InputMode::Text);

        let json = r#"{
            "id": "m2",
            "created_at": "2024-01-15T12:00:00Z",
            "occurred_at": "2024-01-15T12:00:00Z",
            "meal_slot": "snack"
        }"#;
        let meal: MealEvent = serde_json::from_str(json).unwrap();
        assert_eq!(meal.meal_type_tags, vec![MealTag::Unknown]);
    }

    #[test]
    fn test_meal_serialization_uses_snake_case() {
        let meal = MealEvent::new(MealSlot::Snack, Utc::now(), vec![MealTag::HighSugar])
            .description("cookies");
        let json = serde_json::to_string(&meal).unwrap();
        assert!(json.contains("\"meal_slot\":\"snack\""));
        assert!(json.contains("\"high_sugar\""));
        assert!(!json.contains("photo_uri"));
    }

    #[test]
    fn test_mood_dip() {
        let now = Utc::now();
        assert!(MoodEvent::new(Valence::Negative, Energy::Ok, Stress::Low, now).is_dip());
        assert!(MoodEvent::new(Valence::Positive, Energy::Ok, Stress::High, now).is_dip());
        assert!(!MoodEvent::new(Valence::Neutral, Energy::Ok, Stress::Medium, now).is_dip());
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label::<MealTag>("high_sugar"), Ok(MealTag::HighSugar));
        assert_eq!(parse_label::<MealTag>("Fried-Greasy"), Ok(MealTag::FriedGreasy));
        assert_eq!(parse_label::<MealSlot>("Snack"), Ok(MealSlot::Snack));
        assert!(parse_label::<Valence>("ecstatic").is_err());
    }

    #[test]
    fn test_tag_display_name() {
        assert_eq!(MealTag::HighSugar.display_name(), "high sugar");
        assert!(MealTag::Heavy.is_base_load());
        assert!(!MealTag::Sweet.is_base_load());
    }

    #[test]
    fn test_time_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let window = TimeWindow::trailing_days(now, 7);

        assert_eq!(window.duration(), Duration::days(7));
        assert!(window.contains(now - Duration::days(7)));
        assert!(window.contains(now - Duration::hours(1)));
        assert!(!window.contains(now));
        assert!(window.contains_inclusive(now));
        assert!(!window.contains(now - Duration::days(8)));

        assert!(TimeWindow::try_new(now, now).is_none());
    }

    #[test]
    fn test_trailing_days_saturates() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let window = TimeWindow::trailing_days(now, 9_999_999_999_999);
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(window.end, now);

        let window = TimeWindow::trailing_days(now, i64::MAX);
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_local_time() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let meal = MealEvent::new(
            MealSlot::Dinner,
            Utc.with_ymd_and_hms(2024, 1, 16, 2, 30, 0).unwrap(),
            vec![MealTag::Heavy],
        );
        let local = meal.local_time(tz);
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 21:30");
    }
}
