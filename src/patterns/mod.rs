//! Pattern Detection Engine
//!
//! Four independent heuristic detectors scan a window of meal and mood
//! events and report evidence-backed findings:
//!
//! - **mood_dip**: negative or stressed moods followed by eating within an hour
//! - **late_night**: an elevated share of meals after 9 PM in the last week
//! - **snack_shift**: snacking frequency skewed toward weekdays or weekends
//! - **meal_mood**: impact tags (sugar, fried, ...) followed by negative moods
//!
//! Supporting modules:
//!
//! - **segmentation**: dominant time-of-day / day-type of contributing meals
//! - **engine**: runs the detectors in a fixed order and stamps results
//! - **clock**: injected time and id sources
//! - **types**: `Pattern`, `Evidence`, `PatternContext`, ...
//!
//! # Example
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone, Utc};
//! use mealmood::patterns::{FixedClock, PatternEngine, SequentialIds};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap();
//! let engine = PatternEngine::new(FixedOffset::east_opt(0).unwrap())
//!     .with_clock(FixedClock(now))
//!     .with_ids(SequentialIds::new("pattern"));
//!
//! let patterns = engine.run(&[], &[]);
//! assert!(patterns.is_empty());
//! ```

pub mod clock;
pub mod engine;
pub mod late_night;
pub mod meal_mood;
pub mod mood_dip;
pub mod segmentation;
pub mod snack_shift;
pub mod types;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use engine::{default_detectors, Detector, PatternEngine};
pub use late_night::LateNightCluster;
pub use meal_mood::MealTypeMoodAssociation;
pub use mood_dip::MoodDipThenEat;
pub use segmentation::calculate_segmentation;
pub use snack_shift::WeekdayWeekendShift;
pub use types::{
    Confidence, DayType, Evidence, Finding, Level, Pattern, PatternContext, PatternType,
    Segmentation, Severity, TimeOfDay, TriggerPair,
};
