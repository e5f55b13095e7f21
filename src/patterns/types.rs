//! Pattern engine data types
//!
//! - `PatternContext`: the immutable input every detector reads
//! - `Finding`: what a detector emits (no identity yet)
//! - `Pattern`: a finding stamped with an id and creation time by the engine
//! - `Evidence`: one record shape per pattern kind

use crate::events::{MealEvent, MealTag, MoodEvent};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// The four kinds of pattern the engine can report
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    MoodDipThenEat,
    LateNightEatingCluster,
    WeekdayWeekendShift,
    MealTypeMoodAssociation,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::MoodDipThenEat => "mood_dip_then_eat",
            PatternType::LateNightEatingCluster => "late_night_eating_cluster",
            PatternType::WeekdayWeekendShift => "weekday_weekend_shift",
            PatternType::MealTypeMoodAssociation => "meal_type_mood_association",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-step rating used for both confidence and severity
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistical strength of a pattern
pub type Confidence = Level;

/// Assumed impact on the user
pub type Severity = Level;

/// Dominant time-of-day bucket
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// [05:00, 11:00)
    Morning,
    /// [11:00, 17:00)
    Afternoon,
    /// [17:00, 24:00)
    Night,
    /// [00:00, 05:00)
    LateNight,
    Mixed,
}

/// Dominant day-type bucket
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Weekday,
    Weekend,
    Mixed,
}

/// Where in the week the events behind a pattern cluster
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Segmentation {
    pub time_of_day: TimeOfDay,
    pub day_type: DayType,
}

/// A negative/stressed mood followed by a meal
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TriggerPair {
    pub mood_id: String,
    pub meal_id: String,
}

/// Detector-specific statistics backing a pattern's title and description
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    MoodDipThenEat {
        trigger_count: usize,
        window_minutes: i64,
        triggers: Vec<TriggerPair>,
    },
    LateNightEatingCluster {
        late_meal_count: usize,
        /// "HH:MM"
        cutoff_time: String,
        total_weekly_meals: usize,
        /// Late fraction, two decimals
        percentage: String,
    },
    WeekdayWeekendShift {
        weekday_freq: f64,
        weekend_freq: f64,
        /// Winning ratio, two decimals
        ratio: String,
    },
    MealTypeMoodAssociation {
        tag: MealTag,
        total_tag_count: usize,
        mood_drop_count: usize,
        /// drops / total, two decimals
        rate: String,
    },
}

impl Evidence {
    pub fn pattern_type(&self) -> PatternType {
        match self {
            Evidence::MoodDipThenEat { .. } => PatternType::MoodDipThenEat,
            Evidence::LateNightEatingCluster { .. } => PatternType::LateNightEatingCluster,
            Evidence::WeekdayWeekendShift { .. } => PatternType::WeekdayWeekendShift,
            Evidence::MealTypeMoodAssociation { .. } => PatternType::MealTypeMoodAssociation,
        }
    }
}

/// Detector output before the engine assigns identity
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub title: String,
    pub description: String,
    pub confidence: Confidence,
    pub severity: Option<Severity>,
    pub evidence: Evidence,
    pub segmentation: Option<Segmentation>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// A detected behavioral pattern
///
/// Ephemeral: recomputed on every engine run and never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pattern {
    pub id: String,
    pub pattern_type: PatternType,
    pub title: String,
    pub description: String,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub evidence: Evidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<Segmentation>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Pattern {
    pub fn from_finding(finding: Finding, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            pattern_type: finding.evidence.pattern_type(),
            title: finding.title,
            description: finding.description,
            confidence: finding.confidence,
            severity: finding.severity,
            evidence: finding.evidence,
            segmentation: finding.segmentation,
            window_start: finding.window_start,
            window_end: finding.window_end,
            created_at,
        }
    }
}

/// Immutable input bundle handed to every detector
#[derive(Debug, Clone)]
pub struct PatternContext {
    pub meals: Vec<MealEvent>,
    pub moods: Vec<MoodEvent>,
    /// Reference instant for window math
    pub now: DateTime<Utc>,
    /// Offset used for hour-of-day, weekday and calendar-date classification
    pub tz: FixedOffset,
}

impl PatternContext {
    pub fn new(
        meals: Vec<MealEvent>,
        moods: Vec<MoodEvent>,
        now: DateTime<Utc>,
        tz: FixedOffset,
    ) -> Self {
        Self {
            meals,
            moods,
            now,
            tz,
        }
    }

    /// Meals sorted oldest first (the context itself is left untouched)
    pub fn meals_chronological(&self) -> Vec<&MealEvent> {
        let mut meals: Vec<&MealEvent> = self.meals.iter().collect();
        meals.sort_by_key(|m| m.occurred_at);
        meals
    }

    /// Moods sorted oldest first
    pub fn moods_chronological(&self) -> Vec<&MoodEvent> {
        let mut moods: Vec<&MoodEvent> = self.moods.iter().collect();
        moods.sort_by_key(|m| m.occurred_at);
        moods
    }
}

/// Format a ratio with two decimals, the way evidence stores them
pub(crate) fn two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}
