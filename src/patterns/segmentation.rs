//! Segmentation
//!
//! Summarizes where in the day and week a set of meals falls. A time-of-day
//! bucket is reported when it holds at least 60% of the meals; otherwise the
//! result is `Mixed`.
//!
//! Day-type thresholds are asymmetric: five of seven days are weekdays, so
//! a weekday label needs more than 80% of events, while a weekend label
//! needs more than 60%.

use crate::events::MealEvent;
use crate::patterns::types::{DayType, Segmentation, TimeOfDay};
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};

const TIME_OF_DAY_SHARE: f64 = 0.6;
const WEEKDAY_SHARE: f64 = 0.8;
const WEEKEND_SHARE: f64 = 0.6;

/// Saturday or Sunday in the given local time
pub(crate) fn is_weekend(local: &DateTime<FixedOffset>) -> bool {
    matches!(local.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Bucket a local hour (0-23)
pub fn time_of_day_bucket(hour: u32) -> TimeOfDay {
    match hour {
        5..=10 => TimeOfDay::Morning,
        11..=16 => TimeOfDay::Afternoon,
        17..=23 => TimeOfDay::Night,
        _ => TimeOfDay::LateNight,
    }
}

/// Classify the dominant time of day and day type of `events`
///
/// Returns `None` for an empty set.
pub fn calculate_segmentation<'a, I>(events: I, tz: FixedOffset) -> Option<Segmentation>
where
    I: IntoIterator<Item = &'a MealEvent>,
{
    let mut morning = 0usize;
    let mut afternoon = 0usize;
    let mut night = 0usize;
    let mut late_night = 0usize;
    let mut weekday = 0usize;
    let mut weekend = 0usize;

    for event in events {
        let local = event.local_time(tz);

        match time_of_day_bucket(local.hour()) {
            TimeOfDay::Morning => morning += 1,
            TimeOfDay::Afternoon => afternoon += 1,
            TimeOfDay::Night => night += 1,
            _ => late_night += 1,
        }

        if is_weekend(&local) {
            weekend += 1;
        } else {
            weekday += 1;
        }
    }

    let total = weekday + weekend;
    if total == 0 {
        return None;
    }

    let share = |count: usize| count as f64 / total as f64;

    let time_of_day = if share(morning) >= TIME_OF_DAY_SHARE {
        TimeOfDay::Morning
    } else if share(afternoon) >= TIME_OF_DAY_SHARE {
        TimeOfDay::Afternoon
    } else if share(night) >= TIME_OF_DAY_SHARE {
        TimeOfDay::Night
    } else if share(late_night) >= TIME_OF_DAY_SHARE {
        TimeOfDay::LateNight
    } else {
        TimeOfDay::Mixed
    };

    let day_type = if share(weekday) > WEEKDAY_SHARE {
        DayType::Weekday
    } else if share(weekend) > WEEKEND_SHARE {
        DayType::Weekend
    } else {
        DayType::Mixed
    };

    Some(Segmentation {
        time_of_day,
        day_type,
    })
}
