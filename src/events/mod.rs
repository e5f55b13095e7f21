//! Meal & Mood Event Log
//!
//! - **types**: `MealEvent`, `MoodEvent` and their vocabularies, `TimeWindow`
//! - **store**: JSON-file backed `EventStore` and the `EventSource` read seam
//! - **error**: Error types
//!
//! The event log owns all history. The pattern engine only ever reads
//! snapshots taken from it.

pub mod error;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::{EventSource, EventStore, StoreStats};
pub use types::{
    normalize_tags, parse_label, Energy, InputMode, MealEvent, MealSlot, MealTag, MoodEvent,
    MoodTag, PortionSize, Stress, TimeWindow, Valence,
};
