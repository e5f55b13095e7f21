//! Mood-Dip-Then-Eat detector
//!
//! Looks for repeated episodes of a negative or high-stress mood followed
//! shortly by eating. Two episodes is a hard floor: below it nothing is
//! reported, not even a low-confidence finding.
//!
//! Findings also carry the segmentation of the trigger meals.

use crate::patterns::engine::Detector;
use crate::patterns::segmentation::calculate_segmentation;
use crate::patterns::types::{Evidence, Finding, Level, PatternContext, TriggerPair};
use chrono::Duration;

/// Minutes after a mood in which a meal counts as a trigger
pub const TRIGGER_WINDOW_MINUTES: i64 = 60;

const MIN_TRIGGERS: usize = 2;
const HIGH_CONFIDENCE_TRIGGERS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct MoodDipThenEat;

impl Detector for MoodDipThenEat {
    fn name(&self) -> &'static str {
        "mood_dip_then_eat"
    }

    fn detect(&self, ctx: &PatternContext) -> Vec<Finding> {
        let moods = ctx.moods_chronological();
        let meals = ctx.meals_chronological();
        let window = Duration::minutes(TRIGGER_WINDOW_MINUTES);

        let mut triggers = Vec::new();
        let mut trigger_meals = Vec::new();

        for mood in moods.iter().filter(|m| m.is_dip()) {
            let deadline = mood.occurred_at + window;
            let first_meal = meals
                .iter()
                .find(|meal| meal.occurred_at > mood.occurred_at && meal.occurred_at <= deadline);

            if let Some(meal) = first_meal {
                triggers.push(TriggerPair {
                    mood_id: mood.id.clone(),
                    meal_id: meal.id.clone(),
                });
                trigger_meals.push(*meal);
            }
        }

        let trigger_count = triggers.len();
        if trigger_count < MIN_TRIGGERS {
            return Vec::new();
        }

        let confidence = if trigger_count >= HIGH_CONFIDENCE_TRIGGERS {
            Level::High
        } else {
            Level::Medium
        };

        let window_start = moods.first().map(|m| m.occurred_at).unwrap_or(ctx.now);
        let window_end = moods.last().map(|m| m.occurred_at).unwrap_or(ctx.now);

        vec![Finding {
            title: "Mood Dip Trigger".to_string(),
            description: format!(
                "{} instances of high stress or negative mood followed by eating within {} minutes.",
                trigger_count, TRIGGER_WINDOW_MINUTES
            ),
            confidence,
            severity: Some(Level::Medium),
            evidence: Evidence::MoodDipThenEat {
                trigger_count,
                window_minutes: TRIGGER_WINDOW_MINUTES,
                triggers,
            },
            segmentation: calculate_segmentation(trigger_meals, ctx.tz),
            window_start,
            window_end,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Energy, MealEvent, MealSlot, MealTag, MoodEvent, Stress, Valence};
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    fn context(meals: Vec<MealEvent>, moods: Vec<MoodEvent>) -> PatternContext {
        PatternContext::new(meals, moods, at(20, 12, 0), FixedOffset::east_opt(0).unwrap())
    }

    fn sad(id: &str, when: DateTime<Utc>) -> MoodEvent {
        MoodEvent::new(Valence::Negative, Energy::Ok, Stress::High, when).id(id)
    }

    fn snack(id: &str, when: DateTime<Utc>) -> MealEvent {
        MealEvent::new(MealSlot::Snack, when, vec![MealTag::Sweet]).id(id)
    }

    #[test]
    fn test_single_trigger_reports_nothing() {
        let ctx = context(
            vec![snack("meal-1", at(15, 14, 10))],
            vec![sad("mood-1", at(15, 14, 0))],
        );
        assert!(MoodDipThenEat.detect(&ctx).is_empty());
    }

    #[test]
    fn test_two_triggers_medium_confidence() {
        let ctx = context(
            vec![snack("meal-1", at(15, 14, 10)), snack("meal-2", at(14, 14, 10))],
            vec![sad("mood-1", at(15, 14, 0)), sad("mood-2", at(14, 14, 0))],
        );

        let findings = MoodDipThenEat.detect(&ctx);
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert_eq!(finding.confidence, Level::Medium);
        assert_eq!(finding.severity, Some(Level::Medium));
        assert_eq!(finding.window_start, at(14, 14, 0));
        assert_eq!(finding.window_end, at(15, 14, 0));
        assert!(finding.segmentation.is_some());

        match &finding.evidence {
            Evidence::MoodDipThenEat {
                trigger_count,
                window_minutes,
                triggers,
            } => {
                assert_eq!(*trigger_count, 2);
                assert_eq!(*window_minutes, 60);
                // Chronological: yesterday's pair comes first
                assert_eq!(triggers[0].mood_id, "mood-2");
                assert_eq!(triggers[0].meal_id, "meal-2");
            }
            other => panic!("unexpected evidence: {:?}", other),
        }
        assert!(finding.description.starts_with("2 instances"));
    }

    #[test]
    fn test_three_triggers_high_confidence() {
        let ctx = context(
            vec![
                snack("a", at(13, 9, 30)),
                snack("b", at(14, 9, 30)),
                snack("c", at(15, 9, 30)),
            ],
            vec![
                sad("x", at(13, 9, 0)),
                sad("y", at(14, 9, 0)),
                sad("z", at(15, 9, 0)),
            ],
        );
        let findings = MoodDipThenEat.detect(&ctx);
        assert_eq!(findings[0].confidence, Level::High);
    }

    #[test]
    fn test_window_boundaries() {
        // Exactly 60 minutes counts; same instant and 61 minutes do not
        let ctx = context(
            vec![
                snack("on-edge", at(15, 15, 0)),
                snack("same-time", at(16, 14, 0)),
                snack("too-late", at(17, 15, 1)),
            ],
            vec![
                sad("m1", at(15, 14, 0)),
                sad("m2", at(16, 14, 0)),
                sad("m3", at(17, 14, 0)),
            ],
        );
        assert!(MoodDipThenEat.detect(&ctx).is_empty());
    }

    #[test]
    fn test_calm_moods_ignored() {
        let calm = |id: &str, when| {
            MoodEvent::new(Valence::Positive, Energy::High, Stress::Low, when).id(id)
        };
        let ctx = context(
            vec![snack("a", at(14, 9, 10)), snack("b", at(15, 9, 10))],
            vec![calm("x", at(14, 9, 0)), calm("y", at(15, 9, 0))],
        );
        assert!(MoodDipThenEat.detect(&ctx).is_empty());
    }

    #[test]
    fn test_first_meal_is_paired() {
        let ctx = context(
            vec![
                snack("second", at(15, 14, 40)),
                snack("first", at(15, 14, 20)),
                snack("other", at(16, 8, 5)),
            ],
            vec![sad("m1", at(15, 14, 0)), sad("m2", at(16, 8, 0))],
        );
        let findings = MoodDipThenEat.detect(&ctx);
        match &findings[0].evidence {
            Evidence::MoodDipThenEat { triggers, .. } => {
                assert_eq!(triggers[0].meal_id, "first");
                assert_eq!(triggers[1].meal_id, "other");
            }
            other => panic!("unexpected evidence: {:?}", other),
        }
    }
}
