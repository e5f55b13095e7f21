//! Reminder Planner
//!
//! Works out daily reminder times from the meal history. Meals are grouped
//! into morning, afternoon and evening clusters by local hour; each meal
//! reminder fires half an hour after the cluster's average time. Delivery
//! is left to the caller.

use crate::events::MealEvent;
use chrono::{FixedOffset, Timelike};
use serde::Serialize;
use std::ops::Range;

const MINUTES_PER_DAY: u32 = 24 * 60;
const REMINDER_OFFSET_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Meal,
    Mood,
}

/// A daily reminder at a fixed local time
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Reminder {
    pub id: &'static str,
    pub kind: ReminderKind,
    pub title: &'static str,
    pub body: &'static str,
    pub hour: u32,
    pub minute: u32,
}

impl std::fmt::Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}  {}", self.hour, self.minute, self.title)
    }
}

struct MealCluster {
    id: &'static str,
    title: &'static str,
    body: &'static str,
    hours: Range<u32>,
    /// Minute of day used when the cluster has no meals
    default_minute: u32,
}

const CLUSTERS: [MealCluster; 3] = [
    MealCluster {
        id: "meal_morning",
        title: "Morning Fuel",
        body: "It's almost time for your morning meal. Remember to log it!",
        hours: 5..11,
        default_minute: 9 * 60,
    },
    MealCluster {
        id: "meal_afternoon",
        title: "Afternoon Energy",
        body: "Don't forget to eat and log your midday meal.",
        hours: 11..16,
        default_minute: 13 * 60,
    },
    MealCluster {
        id: "meal_evening",
        title: "Evening Nourishment",
        body: "Dinner time is approaching! Log what you eat.",
        hours: 16..22,
        default_minute: 19 * 60,
    },
];

/// Average local minute-of-day of the meals falling in `hours`
fn average_minute(meals: &[MealEvent], hours: &Range<u32>, tz: FixedOffset) -> Option<u32> {
    let minutes: Vec<u32> = meals
        .iter()
        .map(|m| m.local_time(tz))
        .filter(|t| hours.contains(&t.hour()))
        .map(|t| t.hour() * 60 + t.minute())
        .collect();

    mean_minute(&minutes)
}

/// Rounded mean of minutes-of-day, `None` when empty
fn mean_minute(minutes: &[u32]) -> Option<u32> {
    if minutes.is_empty() {
        return None;
    }

    let total: u64 = minutes.iter().map(|&m| u64::from(m)).sum();
    Some((total as f64 / minutes.len() as f64).round() as u32)
}

fn split_minute(minute_of_day: u32) -> (u32, u32) {
    let wrapped = minute_of_day % MINUTES_PER_DAY;
    (wrapped / 60, wrapped % 60)
}

/// One reminder per meal cluster, in morning/afternoon/evening order
pub fn plan_meal_reminders(meals: &[MealEvent], tz: FixedOffset) -> Vec<Reminder> {
    CLUSTERS
        .iter()
        .map(|cluster| {
            let average = average_minute(meals, &cluster.hours, tz).unwrap_or(cluster.default_minute);
            let (hour, minute) = split_minute(average + REMINDER_OFFSET_MINUTES);
            Reminder {
                id: cluster.id,
                kind: ReminderKind::Meal,
                title: cluster.title,
                body: cluster.body,
                hour,
                minute,
            }
        })
        .collect()
}

/// The evening mood check-in
pub fn mood_reminder() -> Reminder {
    Reminder {
        id: "mood_evening",
        kind: ReminderKind::Mood,
        title: "How are you feeling?",
        body: "Take a moment to check in and log your mood for the day.",
        hour: 20,
        minute: 0,
    }
}

/// Meal reminders followed by the mood reminder
pub fn plan_reminders(meals: &[MealEvent], tz: FixedOffset) -> Vec<Reminder> {
    let mut reminders = plan_meal_reminders(meals, tz);
    reminders.push(mood_reminder());

    tracing::debug!(
        meals = meals.len(),
        reminders = reminders.len(),
        "Planned reminders"
    );
    reminders
}
