//! Late-Night Cluster detector
//!
//! Flags an elevated share of meals eaten late at night. This detector
//! restricts itself to the trailing week before `now`, whatever history
//! it is handed.

use crate::events::{MealEvent, TimeWindow};
use crate::patterns::engine::Detector;
use crate::patterns::segmentation::calculate_segmentation;
use crate::patterns::types::{two_decimals, Evidence, Finding, Level, PatternContext};
use chrono::{FixedOffset, Timelike};

/// Meals at or after this local hour are late
pub const LATE_CUTOFF_HOUR: u32 = 21;

/// ...and so are meals before this local hour
pub const EARLY_MORNING_END_HOUR: u32 = 4;

const LOOKBACK_DAYS: i64 = 7;
const MIN_LATE_MEALS: usize = 3;
const MIN_LATE_FRACTION: f64 = 0.30;

/// 21:00 through 03:59, wrapping past midnight
pub fn is_late_meal(meal: &MealEvent, tz: FixedOffset) -> bool {
    let hour = meal.local_time(tz).hour();
    hour >= LATE_CUTOFF_HOUR || hour < EARLY_MORNING_END_HOUR
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LateNightCluster;

impl Detector for LateNightCluster {
    fn name(&self) -> &'static str {
        "late_night_eating_cluster"
    }

    fn detect(&self, ctx: &PatternContext) -> Vec<Finding> {
        let window = TimeWindow::trailing_days(ctx.now, LOOKBACK_DAYS);
        let recent: Vec<&MealEvent> = ctx
            .meals
            .iter()
            .filter(|m| window.contains_inclusive(m.occurred_at))
            .collect();

        if recent.is_empty() {
            return Vec::new();
        }

        let late: Vec<&MealEvent> = recent
            .iter()
            .copied()
            .filter(|m| is_late_meal(m, ctx.tz))
            .collect();

        let late_count = late.len();
        let fraction = late_count as f64 / recent.len() as f64;

        if late_count < MIN_LATE_MEALS && fraction < MIN_LATE_FRACTION {
            return Vec::new();
        }

        vec![Finding {
            title: "Late Night Snacking".to_string(),
            description: format!(
                "You logged {} meals after 9:00 PM in the last {} days.",
                late_count, LOOKBACK_DAYS
            ),
            confidence: Level::High,
            severity: Some(Level::Medium),
            evidence: Evidence::LateNightEatingCluster {
                late_meal_count: late_count,
                cutoff_time: format!("{:02}:00", LATE_CUTOFF_HOUR),
                total_weekly_meals: recent.len(),
                percentage: two_decimals(fraction),
            },
            segmentation: calculate_segmentation(late, ctx.tz),
            window_start: window.start,
            window_end: window.end,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MealSlot, MealTag};
    use crate::patterns::types::{DayType, TimeOfDay};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    // Wednesday 2024-01-17, 23:59 UTC
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 17, 23, 59, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn meal(day: u32, hour: u32, minute: u32) -> MealEvent {
        MealEvent::new(
            MealSlot::Snack,
            Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap(),
            vec![MealTag::Sweet],
        )
    }

    fn run(meals: Vec<MealEvent>) -> Vec<Finding> {
        LateNightCluster.detect(&PatternContext::new(meals, vec![], now(), utc()))
    }

    #[test]
    fn test_no_recent_meals() {
        assert!(run(vec![]).is_empty());
        // Only history older than a week
        assert!(run(vec![meal(1, 22, 0), meal(2, 23, 0), meal(3, 22, 0)]).is_empty());
    }

    #[test]
    fn test_no_late_meals() {
        assert!(run(vec![meal(17, 12, 0), meal(16, 12, 0)]).is_empty());
    }

    #[test]
    fn test_three_late_of_five() {
        let meals = vec![
            meal(17, 22, 30),
            meal(16, 22, 30),
            meal(15, 22, 30),
            meal(17, 12, 0),
            meal(16, 12, 0),
        ];
        let findings = run(meals);
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert_eq!(finding.confidence, Level::High);
        assert_eq!(finding.severity, Some(Level::Medium));
        assert_eq!(finding.window_start, now() - Duration::days(7));
        assert_eq!(finding.window_end, now());

        match &finding.evidence {
            Evidence::LateNightEatingCluster {
                late_meal_count,
                cutoff_time,
                total_weekly_meals,
                percentage,
            } => {
                assert_eq!(*late_meal_count, 3);
                assert_eq!(cutoff_time, "21:00");
                assert_eq!(*total_weekly_meals, 5);
                assert_eq!(percentage, "0.60");
            }
            other => panic!("unexpected evidence: {:?}", other),
        }

        // Segmentation is computed over the late meals only
        let seg = finding.segmentation.unwrap();
        assert_eq!(seg.time_of_day, TimeOfDay::Night);
        assert_eq!(seg.day_type, DayType::Weekday);
    }

    #[test]
    fn test_fraction_alone_triggers() {
        // 2 late of 6 = 33%
        let meals = vec![
            meal(17, 1, 30),
            meal(16, 21, 0),
            meal(17, 8, 0),
            meal(17, 12, 0),
            meal(16, 8, 0),
            meal(16, 12, 0),
        ];
        assert_eq!(run(meals).len(), 1);
    }

    #[test]
    fn test_below_both_thresholds() {
        // 2 late of 7 = 28.6%
        let meals = vec![
            meal(17, 22, 0),
            meal(16, 22, 0),
            meal(17, 8, 0),
            meal(17, 12, 0),
            meal(16, 8, 0),
            meal(16, 12, 0),
            meal(15, 12, 0),
        ];
        assert!(run(meals).is_empty());
    }

    #[test]
    fn test_late_hours_wrap_midnight() {
        assert!(is_late_meal(&meal(17, 21, 0), utc()));
        assert!(is_late_meal(&meal(17, 3, 59), utc()));
        assert!(!is_late_meal(&meal(17, 4, 0), utc()));
        assert!(!is_late_meal(&meal(17, 20, 59), utc()));
    }
}
