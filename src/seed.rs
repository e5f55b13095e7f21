//! Demo data
//!
//! A week of meals and moods shaped to show off the detectors: stressed
//! moods before dinner, late sugary snacks followed by a low mood.

use crate::events::{
    Energy, MealEvent, MealSlot, MealTag, MoodEvent, MoodTag, Stress, Valence,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

const SEED_DAYS: i64 = 7;

/// Local wall-clock time on `date` as a UTC instant
fn local_instant(date: NaiveDate, hour: u32, minute: u32, tz: FixedOffset) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, 0)?
        .and_local_timezone(tz)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

fn seed_meal(slot: MealSlot, at: DateTime<Utc>, tags: Vec<MealTag>) -> MealEvent {
    MealEvent::new(slot, at, tags)
        .created_at(at)
        .description(format!("Seed {}", slot))
}

fn seed_mood(
    valence: Valence,
    energy: Energy,
    stress: Stress,
    tag: MoodTag,
    at: DateTime<Utc>,
) -> MoodEvent {
    MoodEvent::new(valence, energy, stress, at)
        .created_at(at)
        .tag(tag)
}

/// Generate seven days of demo history ending at `now`
///
/// Events that would fall after `now` are left out. Both lists come back
/// newest first.
pub fn generate_seed_data(now: DateTime<Utc>, tz: FixedOffset) -> (Vec<MealEvent>, Vec<MoodEvent>) {
    let mut meals = Vec::new();
    let mut moods = Vec::new();

    for days_ago in 0..SEED_DAYS {
        let date = (now - Duration::days(days_ago)).with_timezone(&tz).date_naive();

        let mut slots = vec![
            (MealSlot::Breakfast, 8, vec![MealTag::Light, MealTag::Homemade, MealTag::HighFiber]),
            (MealSlot::Lunch, 12, vec![MealTag::Regular, MealTag::Savory]),
            (MealSlot::Dinner, 19, vec![MealTag::Heavy, MealTag::Savory]),
        ];

        // Every other day ends with a late sugary snack
        if days_ago % 2 == 0 {
            slots.push((
                MealSlot::Snack,
                22,
                vec![MealTag::HighSugar, MealTag::Sweet, MealTag::Packaged],
            ));
        }

        for (slot, hour, tags) in slots {
            let Some(at) = local_instant(date, hour, 15, tz) else {
                continue;
            };
            let sugary = tags.contains(&MealTag::HighSugar);
            meals.push(seed_meal(slot, at, tags));

            if sugary {
                let mood_at = at + Duration::minutes(75);
                moods.push(
                    seed_mood(Valence::Negative, Energy::Low, Stress::Low, MoodTag::Sad, mood_at)
                        .notes("Felt bad after sweets"),
                );
            }
        }

        let mood = if days_ago % 2 == 1 {
            local_instant(date, 18, 30, tz).map(|at| {
                seed_mood(Valence::Negative, Energy::Low, Stress::High, MoodTag::Anxious, at)
                    .notes("Work stress")
            })
        } else {
            local_instant(date, 10, 0, tz).map(|at| {
                seed_mood(Valence::Positive, Energy::Ok, Stress::Low, MoodTag::Celebratory, at)
            })
        };
        moods.extend(mood);
    }

    meals.retain(|m| m.occurred_at <= now);
    moods.retain(|m| m.occurred_at <= now);
    meals.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    moods.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    tracing::debug!(meals = meals.len(), moods = moods.len(), "Generated seed data");
    (meals, moods)
}
