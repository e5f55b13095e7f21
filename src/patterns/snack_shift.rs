//! Weekday/Weekend Snack Shift detector
//!
//! Compares how often snacks are logged per active day on weekdays versus
//! weekends. Frequencies are normalized by the number of distinct calendar
//! days on each side, not by the number of events.

use crate::events::MealSlot;
use crate::patterns::engine::Detector;
use crate::patterns::segmentation::is_weekend;
use crate::patterns::types::{two_decimals, Evidence, Finding, Level, PatternContext};
use chrono::NaiveDate;
use std::collections::HashSet;

const MIN_SNACKS: usize = 5;
const SHIFT_RATIO: f64 = 1.5;
/// Ratio reported when the other side has snacks-per-day of zero
const SENTINEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdayWeekendShift;

/// `numerator / denominator`, with the sentinel when only the denominator is zero
fn shift_ratio(numerator: f64, denominator: f64) -> f64 {
    if numerator <= 0.0 {
        0.0
    } else if denominator > 0.0 {
        numerator / denominator
    } else {
        SENTINEL_RATIO
    }
}

impl Detector for WeekdayWeekendShift {
    fn name(&self) -> &'static str {
        "weekday_weekend_shift"
    }

    fn detect(&self, ctx: &PatternContext) -> Vec<Finding> {
        let snacks: Vec<_> = ctx
            .meals
            .iter()
            .filter(|m| m.meal_slot == MealSlot::Snack)
            .collect();

        if snacks.len() < MIN_SNACKS {
            return Vec::new();
        }

        let mut weekday_snacks = 0usize;
        let mut weekend_snacks = 0usize;
        let mut weekday_days: HashSet<NaiveDate> = HashSet::new();
        let mut weekend_days: HashSet<NaiveDate> = HashSet::new();

        for snack in &snacks {
            let local = snack.local_time(ctx.tz);
            if is_weekend(&local) {
                weekend_snacks += 1;
                weekend_days.insert(local.date_naive());
            } else {
                weekday_snacks += 1;
                weekday_days.insert(local.date_naive());
            }
        }

        // Both sides need at least one real day to compare against
        if weekday_days.is_empty() || weekend_days.is_empty() {
            return Vec::new();
        }

        let weekday_freq = weekday_snacks as f64 / weekday_days.len() as f64;
        let weekend_freq = weekend_snacks as f64 / weekend_days.len() as f64;

        let ratio = shift_ratio(weekend_freq, weekday_freq);
        let inverse_ratio = shift_ratio(weekday_freq, weekend_freq);

        let (title, description, winning_ratio) = if ratio >= SHIFT_RATIO {
            (
                "Weekend Snacking Shift",
                format!("You snack {:.1}x more often on weekends than weekdays.", ratio),
                ratio,
            )
        } else if inverse_ratio >= SHIFT_RATIO {
            (
                "Weekday Snacking Shift",
                format!(
                    "You snack {:.1}x more often on weekdays than weekends.",
                    inverse_ratio
                ),
                inverse_ratio,
            )
        } else {
            return Vec::new();
        };

        // Bounds come from the data, never from the caller's ordering
        let Some(window_start) = ctx.meals.iter().map(|m| m.occurred_at).min() else {
            return Vec::new();
        };
        let window_end = ctx
            .meals
            .iter()
            .map(|m| m.occurred_at)
            .max()
            .unwrap_or(window_start);

        vec![Finding {
            title: title.to_string(),
            description,
            confidence: Level::Medium,
            severity: None,
            evidence: Evidence::WeekdayWeekendShift {
                weekday_freq,
                weekend_freq,
                ratio: two_decimals(winning_ratio),
            },
            segmentation: None,
            window_start,
            window_end,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MealEvent, MealTag};
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn snack(day: u32, hour: u32) -> MealEvent {
        MealEvent::new(MealSlot::Snack, at(day, hour), vec![MealTag::Packaged])
    }

    fn run(meals: Vec<MealEvent>) -> Vec<Finding> {
        let ctx = PatternContext::new(meals, vec![], at(21, 12), FixedOffset::east_opt(0).unwrap());
        WeekdayWeekendShift.detect(&ctx)
    }

    /// 4 snacks each on Sat 13th and Sun 14th, one per weekday Mon 15th - Fri 19th
    fn weekend_heavy() -> Vec<MealEvent> {
        let mut meals = Vec::new();
        for day in [13, 14] {
            for hour in [10, 13, 16, 20] {
                meals.push(snack(day, hour));
            }
        }
        for day in 15..20 {
            meals.push(snack(day, 14));
        }
        meals
    }

    #[test]
    fn test_too_few_snacks() {
        let meals = vec![snack(13, 10), snack(14, 10), snack(15, 10), snack(16, 10)];
        assert!(run(meals).is_empty());
    }

    #[test]
    fn test_weekend_shift() {
        let findings = run(weekend_heavy());
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert!(finding.title.contains("Weekend"));
        assert_eq!(finding.confidence, Level::Medium);
        assert_eq!(finding.severity, None);
        assert_eq!(
            finding.description,
            "You snack 4.0x more often on weekends than weekdays."
        );

        match &finding.evidence {
            Evidence::WeekdayWeekendShift {
                weekday_freq,
                weekend_freq,
                ratio,
            } => {
                assert_eq!(*weekday_freq, 1.0);
                assert_eq!(*weekend_freq, 4.0);
                assert_eq!(ratio, "4.00");
            }
            other => panic!("unexpected evidence: {:?}", other),
        }
    }

    #[test]
    fn test_window_bounds_ignore_input_order() {
        let mut meals = weekend_heavy();
        meals.reverse();
        meals.swap(0, 5);

        let finding = &run(meals)[0];
        assert_eq!(finding.window_start, at(13, 10));
        assert_eq!(finding.window_end, at(19, 14));
    }

    #[test]
    fn test_weekday_shift() {
        // 2 per weekday over 3 weekdays, 1 on a single weekend day
        let meals = vec![
            snack(15, 10),
            snack(15, 15),
            snack(16, 10),
            snack(16, 15),
            snack(17, 10),
            snack(17, 15),
            snack(13, 12),
        ];
        let findings = run(meals);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].title.contains("Weekday"));
        match &findings[0].evidence {
            Evidence::WeekdayWeekendShift { ratio, .. } => assert_eq!(ratio, "2.00"),
            other => panic!("unexpected evidence: {:?}", other),
        }
    }

    #[test]
    fn test_balanced_week_reports_nothing() {
        let meals = vec![
            snack(13, 10),
            snack(14, 10),
            snack(15, 10),
            snack(16, 10),
            snack(17, 10),
        ];
        assert!(run(meals).is_empty());
    }

    #[test]
    fn test_one_sided_week_reports_nothing() {
        let meals = (15..20).map(|day| snack(day, 10)).collect();
        assert!(run(meals).is_empty());
    }

    #[test]
    fn test_non_snacks_ignored() {
        let mut meals: Vec<MealEvent> = (13..20)
            .map(|day| MealEvent::new(MealSlot::Lunch, at(day, 12), vec![MealTag::Regular]))
            .collect();
        meals.push(snack(13, 10));
        assert!(run(meals).is_empty());
    }

    #[test]
    fn test_shift_ratio_sentinel() {
        assert_eq!(shift_ratio(3.0, 0.0), 2.0);
        assert_eq!(shift_ratio(0.0, 3.0), 0.0);
        assert_eq!(shift_ratio(3.0, 2.0), 1.5);
    }
}
