//! Weekly Report
//!
//! Presentation policy on top of the pattern engine: refuses to analyze a
//! thin week, ranks what the engine found and keeps the top few.

use crate::events::{EventSource, TimeWindow};
use crate::patterns::{DayType, Level, Pattern, PatternEngine, Segmentation, TimeOfDay};
use serde::Serialize;

/// Minimum data needed before patterns are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatingPolicy {
    pub window_days: i64,
    pub min_meals: usize,
    pub min_moods: usize,
    pub top_n: usize,
}

impl Default for GatingPolicy {
    fn default() -> Self {
        Self {
            window_days: 7,
            min_meals: 5,
            min_moods: 3,
            top_n: 3,
        }
    }
}

/// Outcome of a weekly analysis
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    NotEnoughMeals,
    NotEnoughMoods,
    NoPatterns,
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub window: TimeWindow,
    pub meal_count: usize,
    pub mood_count: usize,
    /// How many patterns the engine found before truncation
    pub total_detected: usize,
    pub patterns: Vec<Pattern>,
}

impl GatingPolicy {
    /// User-facing message for a status, if any
    pub fn message(&self, status: ReportStatus) -> Option<String> {
        match status {
            ReportStatus::NotEnoughMeals => Some(format!(
                "Not enough meal data yet. Log at least {} meals this week to see patterns.",
                self.min_meals
            )),
            ReportStatus::NotEnoughMoods => Some(format!(
                "Not enough mood data yet. Log at least {} moods this week to see patterns.",
                self.min_moods
            )),
            ReportStatus::NoPatterns => Some("No patterns detected yet. Keep logging!".to_string()),
            ReportStatus::Ready => None,
        }
    }
}

fn severity_score(severity: Option<Level>) -> u8 {
    match severity {
        Some(Level::High) => 3,
        Some(Level::Medium) => 2,
        Some(Level::Low) => 1,
        None => 0,
    }
}

/// Sort by severity then confidence, both descending
///
/// The sort is stable: ties keep engine order.
pub fn rank_patterns(patterns: &mut [Pattern]) {
    patterns.sort_by(|a, b| {
        severity_score(b.severity)
            .cmp(&severity_score(a.severity))
            .then_with(|| b.confidence.cmp(&a.confidence))
    });
}

/// Build the weekly report from the trailing window of `source`
///
/// Only events in [now - window, now] are counted; anything dated later is ignored.
pub async fn build_weekly_report(
    source: &dyn EventSource,
    engine: &PatternEngine,
    policy: &GatingPolicy,
) -> WeeklyReport {
    let window = TimeWindow::trailing_days(engine.now(), policy.window_days);
    let meals: Vec<_> = source
        .meals_since(window.start)
        .await
        .into_iter()
        .filter(|m| window.contains_inclusive(m.occurred_at))
        .collect();
    let moods: Vec<_> = source
        .moods_since(window.start)
        .await
        .into_iter()
        .filter(|m| window.contains_inclusive(m.occurred_at))
        .collect();

    let status = if meals.len() < policy.min_meals {
        Some(ReportStatus::NotEnoughMeals)
    } else if moods.len() < policy.min_moods {
        Some(ReportStatus::NotEnoughMoods)
    } else {
        None
    };

    if let Some(status) = status {
        tracing::debug!(
            meals = meals.len(),
            moods = moods.len(),
            status = ?status,
            "Weekly report gated"
        );
        return WeeklyReport {
            status,
            message: policy.message(status),
            window,
            meal_count: meals.len(),
            mood_count: moods.len(),
            total_detected: 0,
            patterns: Vec::new(),
        };
    }

    let mut patterns = engine.run(&meals, &moods);
    let total_detected = patterns.len();
    rank_patterns(&mut patterns);
    patterns.truncate(policy.top_n);

    let status = if patterns.is_empty() {
        ReportStatus::NoPatterns
    } else {
        ReportStatus::Ready
    };

    WeeklyReport {
        status,
        message: policy.message(status),
        window,
        meal_count: meals.len(),
        mood_count: moods.len(),
        total_detected,
        patterns,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Short "Mostly: Weekdays, Night" label, or None when nothing dominates
pub fn describe_segmentation(segmentation: &Segmentation) -> Option<String> {
    let mut parts = Vec::new();

    match segmentation.day_type {
        DayType::Weekday => parts.push("Weekdays".to_string()),
        DayType::Weekend => parts.push("Weekends".to_string()),
        DayType::Mixed => {}
    }

    let time = match segmentation.time_of_day {
        TimeOfDay::Morning => Some("morning"),
        TimeOfDay::Afternoon => Some("afternoon"),
        TimeOfDay::Night => Some("night"),
        TimeOfDay::LateNight => Some("late night"),
        TimeOfDay::Mixed => None,
    };
    if let Some(time) = time {
        parts.push(capitalize(time));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("Mostly: {}", parts.join(", ")))
    }
}
