//! Meal-Type -> Mood Association detector
//!
//! For a fixed set of "impact" tags, measures how often a tagged meal is
//! followed by a negative mood within four hours. A meal counts as a drop
//! when ANY mood in that window is negative, even if others are positive.

use crate::events::{MealTag, Valence};
use crate::patterns::engine::Detector;
use crate::patterns::types::{two_decimals, Evidence, Finding, Level, PatternContext};
use chrono::Duration;
use std::collections::HashMap;

/// Tags evaluated, in reporting order
pub const TARGET_TAGS: [MealTag; 5] = [
    MealTag::HighSugar,
    MealTag::FriedGreasy,
    MealTag::Heavy,
    MealTag::Caffeinated,
    MealTag::Sweet,
];

const FOLLOW_UP_HOURS: i64 = 4;
const MIN_OBSERVED: usize = 3;
const MIN_DROP_RATE: f64 = 0.60;
const HIGH_CONFIDENCE_RATE: f64 = 0.80;

#[derive(Debug, Default, Clone, Copy)]
struct TagStats {
    total: usize,
    drops: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MealTypeMoodAssociation;

impl Detector for MealTypeMoodAssociation {
    fn name(&self) -> &'static str {
        "meal_type_mood_association"
    }

    fn detect(&self, ctx: &PatternContext) -> Vec<Finding> {
        let meals = ctx.meals_chronological();
        let moods = ctx.moods_chronological();
        let follow_up = Duration::hours(FOLLOW_UP_HOURS);

        let mut stats: HashMap<MealTag, TagStats> = HashMap::new();

        for meal in &meals {
            let present: Vec<MealTag> = meal
                .meal_type_tags
                .iter()
                .copied()
                .filter(|t| TARGET_TAGS.contains(t))
                .collect();

            if present.is_empty() {
                continue;
            }

            let deadline = meal.occurred_at + follow_up;
            let mut subsequent = moods
                .iter()
                .filter(|m| m.occurred_at > meal.occurred_at && m.occurred_at <= deadline)
                .peekable();

            if subsequent.peek().is_none() {
                continue;
            }

            let has_negative = subsequent.any(|m| m.valence == Valence::Negative);

            for tag in present {
                let entry = stats.entry(tag).or_default();
                entry.total += 1;
                if has_negative {
                    entry.drops += 1;
                }
            }
        }

        let window_start = meals.first().map(|m| m.occurred_at).unwrap_or(ctx.now);

        let mut findings = Vec::new();
        for tag in TARGET_TAGS {
            let Some(TagStats { total, drops }) = stats.get(&tag).copied() else {
                continue;
            };
            if total < MIN_OBSERVED {
                continue;
            }

            let rate = drops as f64 / total as f64;
            if rate < MIN_DROP_RATE {
                continue;
            }

            let confidence = if rate >= HIGH_CONFIDENCE_RATE {
                Level::High
            } else {
                Level::Medium
            };

            let name = tag.display_name();
            findings.push(Finding {
                title: format!("{} & Mood", name),
                description: format!(
                    "{:.0}% of '{}' meals are followed by negative mood within {} hours.",
                    rate * 100.0,
                    name,
                    FOLLOW_UP_HOURS
                ),
                confidence,
                severity: None,
                evidence: Evidence::MealTypeMoodAssociation {
                    tag,
                    total_tag_count: total,
                    mood_drop_count: drops,
                    rate: two_decimals(rate),
                },
                segmentation: None,
                window_start,
                window_end: ctx.now,
            });
        }

        findings
    }
}
