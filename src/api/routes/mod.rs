//! API Routes
//!
//! Route handlers organized by functionality.

pub mod events;
pub mod export;
pub mod health;
pub mod meals;
pub mod moods;
pub mod patterns;
pub mod reminders;

use crate::api::error::{ApiError, ApiResult};
use crate::events::parse_label;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parse an optional RFC 3339 timestamp, defaulting to `now`
pub(crate) fn parse_timestamp(value: Option<&str>, now: DateTime<Utc>) -> ApiResult<DateTime<Utc>> {
    match value {
        None => Ok(now),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ApiError::Validation(format!("Cannot parse timestamp: {}", s))),
    }
}

/// Parse a label field ("snack", "high_sugar") into its enum
pub(crate) fn parse_field<T: DeserializeOwned>(field: &str, value: &str) -> ApiResult<T> {
    parse_label(value).map_err(|e| ApiError::Validation(format!("{}: {}", field, e)))
}

/// Longest accepted day window (about a century)
pub(crate) const MAX_DAYS: i64 = 36_500;

/// Reject non-positive or out-of-range day windows
pub(crate) fn validate_days(days: Option<i64>) -> ApiResult<Option<i64>> {
    match days {
        Some(d) if d <= 0 => Err(ApiError::Validation(
            "days must be a positive number".to_string(),
        )),
        Some(d) if d > MAX_DAYS => Err(ApiError::Validation(format!(
            "days must be at most {}",
            MAX_DAYS
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MealSlot;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp(None, now).unwrap(), now);
        assert_eq!(
            parse_timestamp(Some("2024-01-15T13:00:00+01:00"), now).unwrap(),
            now
        );
        assert!(parse_timestamp(Some("yesterday"), now).is_err());
    }

    #[test]
    fn test_parse_field() {
        let slot: MealSlot = parse_field("meal_slot", "Snack").unwrap();
        assert_eq!(slot, MealSlot::Snack);
        assert!(parse_field::<MealSlot>("meal_slot", "brunch").is_err());
    }

    #[test]
    fn test_validate_days() {
        assert_eq!(validate_days(None).unwrap(), None);
        assert_eq!(validate_days(Some(7)).unwrap(), Some(7));
        assert!(validate_days(Some(0)).is_err());
        assert_eq!(validate_days(Some(MAX_DAYS)).unwrap(), Some(MAX_DAYS));
        assert!(validate_days(Some(MAX_DAYS + 1)).is_err());
        assert!(validate_days(Some(i64::MAX)).is_err());
    }
}
