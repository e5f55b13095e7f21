//! One-line meal summaries for timelines
//!
//! `"Lunch • Regular • Savory"`: the slot plus at most two tags, preferring
//! one base-load tag and one other.

use crate::events::{MealEvent, MealTag};

fn title_case(label: &str) -> String {
    label
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Pick up to two tags to show
fn summary_tags(tags: &[MealTag]) -> Vec<MealTag> {
    let known: Vec<MealTag> = tags
        .iter()
        .copied()
        .filter(|t| *t != MealTag::Unknown)
        .collect();

    let Some(base) = known.iter().copied().find(MealTag::is_base_load) else {
        return known.into_iter().take(2).collect();
    };

    let mut picked = vec![base];
    picked.extend(known.iter().copied().filter(|t| !t.is_base_load()).take(1));
    picked
}

pub fn format_meal_summary(meal: &MealEvent) -> String {
    let slot = title_case(meal.meal_slot.as_str());
    let tags = summary_tags(&meal.meal_type_tags);

    if tags.is_empty() {
        return format!("{} • Unknown", slot);
    }

    let labels: Vec<String> = tags.iter().map(|t| title_case(t.as_str())).collect();
    format!("{} • {}", slot, labels.join(" • "))
}
