//! Event Store
//!
//! Owns the meal and mood history. Events live in memory behind an async
//! RwLock and, for a persistent store, are written to a single JSON file
//! after every mutation (temp file + rename).
//!
//! Both lists are kept newest-first by occurrence time. Records that fail
//! to parse when the file is loaded (bad timestamps, unknown enum values)
//! are skipped and counted, never fatal.

use crate::events::error::{StoreError, StoreResult};
use crate::events::types::{MealEvent, MoodEvent, TimeWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Read-side seam over the event history
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Meals occurring at or after `start`
    async fn meals_since(&self, start: DateTime<Utc>) -> Vec<MealEvent>;

    /// Moods occurring at or after `start`
    async fn moods_since(&self, start: DateTime<Utc>) -> Vec<MoodEvent>;

    /// The full meal history
    async fn all_meals(&self) -> Vec<MealEvent>;
}

#[derive(Debug, Clone, Default, Serialize)]
struct EventLog {
    meals: Vec<MealEvent>,
    moods: Vec<MoodEvent>,
}

impl EventLog {
    fn sort(&mut self) {
        self.meals.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        self.moods.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub meal_count: usize,
    pub mood_count: usize,
    /// Records dropped while loading because they could not be parsed
    pub skipped_records: usize,
    pub persistent: bool,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "meals={}, moods={}, skipped={}, persistent={}",
            self.meal_count, self.mood_count, self.skipped_records, self.persistent
        )
    }
}

/// Meal and mood history
pub struct EventStore {
    path: Option<PathBuf>,
    log: RwLock<EventLog>,
    skipped_records: usize,
}

impl EventStore {
    /// Open (or create) a store backed by the JSON file at `path`
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let (log, skipped_records) = load_log(&path)?;

        tracing::info!(
            path = ?path,
            meals = log.meals.len(),
            moods = log.moods.len(),
            skipped = skipped_records,
            "Event store opened"
        );

        Ok(Self {
            path: Some(path),
            log: RwLock::new(log),
            skipped_records,
        })
    }

    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            log: RwLock::new(EventLog::default()),
            skipped_records: 0,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All meals, newest first
    pub async fn meals(&self) -> Vec<MealEvent> {
        self.log.read().await.meals.clone()
    }

    /// All moods, newest first
    pub async fn moods(&self) -> Vec<MoodEvent> {
        self.log.read().await.moods.clone()
    }

    /// Meals with occurrence time inside `window`
    pub async fn meals_in(&self, window: TimeWindow) -> Vec<MealEvent> {
        let log = self.log.read().await;
        log.meals
            .iter()
            .filter(|m| window.contains(m.occurred_at))
            .cloned()
            .collect()
    }

    /// Moods with occurrence time inside `window`
    pub async fn moods_in(&self, window: TimeWindow) -> Vec<MoodEvent> {
        let log = self.log.read().await;
        log.moods
            .iter()
            .filter(|m| window.contains(m.occurred_at))
            .cloned()
            .collect()
    }

    pub async fn get_meal(&self, id: &str) -> Option<MealEvent> {
        let log = self.log.read().await;
        log.meals.iter().find(|m| m.id == id).cloned()
    }

    pub async fn get_mood(&self, id: &str) -> Option<MoodEvent> {
        let log = self.log.read().await;
        log.moods.iter().find(|m| m.id == id).cloned()
    }

    /// Add a meal
    pub async fn add_meal(&self, meal: MealEvent) -> StoreResult<()> {
        let mut log = self.log.write().await;
        if log.meals.iter().any(|m| m.id == meal.id) {
            return Err(StoreError::DuplicateId(meal.id));
        }

        tracing::debug!(id = %meal.id, slot = %meal.meal_slot, "Adding meal");
        let mut next = log.clone();
        next.meals.push(meal);
        next.sort();
        self.commit(&mut log, next)
    }

    /// Replace a stored meal with an edited version (matched by id)
    pub async fn update_meal(&self, meal: MealEvent) -> StoreResult<()> {
        let mut log = self.log.write().await;
        let index = log
            .meals
            .iter()
            .position(|m| m.id == meal.id)
            .ok_or_else(|| StoreError::NotFound(meal.id.clone()))?;

        let mut next = log.clone();
        next.meals[index] = meal;
        next.sort();
        self.commit(&mut log, next)
    }

    pub async fn delete_meal(&self, id: &str) -> StoreResult<()> {
        let mut log = self.log.write().await;
        if !log.meals.iter().any(|m| m.id == id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut next = log.clone();
        next.meals.retain(|m| m.id != id);
        self.commit(&mut log, next)?;

        tracing::debug!(id = %id, "Deleted meal");
        Ok(())
    }

    /// Add a mood
    pub async fn add_mood(&self, mood: MoodEvent) -> StoreResult<()> {
        let mut log = self.log.write().await;
        if log.moods.iter().any(|m| m.id == mood.id) {
            return Err(StoreError::DuplicateId(mood.id));
        }

        tracing::debug!(id = %mood.id, "Adding mood");
        let mut next = log.clone();
        next.moods.push(mood);
        next.sort();
        self.commit(&mut log, next)
    }

    /// Replace a stored mood with an edited version (matched by id)
    pub async fn update_mood(&self, mood: MoodEvent) -> StoreResult<()> {
        let mut log = self.log.write().await;
        let index = log
            .moods
            .iter()
            .position(|m| m.id == mood.id)
            .ok_or_else(|| StoreError::NotFound(mood.id.clone()))?;

        let mut next = log.clone();
        next.moods[index] = mood;
        next.sort();
        self.commit(&mut log, next)
    }

    pub async fn delete_mood(&self, id: &str) -> StoreResult<()> {
        let mut log = self.log.write().await;
        if !log.moods.iter().any(|m| m.id == id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut next = log.clone();
        next.moods.retain(|m| m.id != id);
        self.commit(&mut log, next)?;

        tracing::debug!(id = %id, "Deleted mood");
        Ok(())
    }

    /// Remove every meal and mood
    pub async fn clear(&self) -> StoreResult<()> {
        let mut log = self.log.write().await;
        self.commit(&mut log, EventLog::default())?;

        tracing::info!("Cleared all events");
        Ok(())
    }

    /// Replace the whole history (used for demo seeding)
    pub async fn replace_all(
        &self,
        meals: Vec<MealEvent>,
        moods: Vec<MoodEvent>,
    ) -> StoreResult<()> {
        let mut log = self.log.write().await;
        let mut next = EventLog { meals, moods };
        next.sort();

        let (meal_count, mood_count) = (next.meals.len(), next.moods.len());
        self.commit(&mut log, next)?;

        tracing::info!(meals = meal_count, moods = mood_count, "Replaced event history");
        Ok(())
    }

    /// Persist `next`, then make it the live log
    ///
    /// On a failed write the live log is left untouched.
    fn commit(&self, log: &mut EventLog, next: EventLog) -> StoreResult<()> {
        self.persist(&next)?;
        *log = next;
        Ok(())
    }

    pub async fn stats(&self) -> StoreStats {
        let log = self.log.read().await;
        StoreStats {
            meal_count: log.meals.len(),
            mood_count: log.moods.len(),
            skipped_records: self.skipped_records,
            persistent: self.path.is_some(),
        }
    }

    fn persist(&self, log: &EventLog) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(log)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[async_trait]
impl EventSource for EventStore {
    async fn meals_since(&self, start: DateTime<Utc>) -> Vec<MealEvent> {
        let log = self.log.read().await;
        log.meals
            .iter()
            .filter(|m| m.occurred_at >= start)
            .cloned()
            .collect()
    }

    async fn moods_since(&self, start: DateTime<Utc>) -> Vec<MoodEvent> {
        let log = self.log.read().await;
        log.moods
            .iter()
            .filter(|m| m.occurred_at >= start)
            .cloned()
            .collect()
    }

    async fn all_meals(&self) -> Vec<MealEvent> {
        self.meals().await
    }
}

/// Load the log file, skipping records that do not parse
fn load_log(path: &Path) -> StoreResult<(EventLog, usize)> {
    if !path.exists() {
        return Ok((EventLog::default(), 0));
    }

    let content = std::fs::read_to_string(path)?;
    let root: serde_json::Value = serde_json::from_str(&content)?;

    let (meals, skipped_meals) = parse_records::<MealEvent>(&root, "meals");
    let (moods, skipped_moods) = parse_records::<MoodEvent>(&root, "moods");

    let mut log = EventLog { meals, moods };
    log.sort();
    Ok((log, skipped_meals + skipped_moods))
}

fn parse_records<T: DeserializeOwned>(root: &serde_json::Value, key: &str) -> (Vec<T>, usize) {
    let Some(records) = root.get(key).and_then(|v| v.as_array()) else {
        return (Vec::new(), 0);
    };

    let mut parsed = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (index, record) in records.iter().enumerate() {
        match serde_json::from_value::<T>(record.clone()) {
            Ok(event) => parsed.push(event),
            Err(e) => {
                skipped += 1;
                tracing::warn!(kind = key, index, error = %e, "Skipping unparsable event record");
            }
        }
    }

    (parsed, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::{Energy, MealSlot, MealTag, Stress, Valence};
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn meal(id: &str, at: DateTime<Utc>) -> MealEvent {
        MealEvent::new(MealSlot::Lunch, at, vec![MealTag::Regular]).id(id)
    }

    fn mood(id: &str, at: DateTime<Utc>) -> MoodEvent {
        MoodEvent::new(Valence::Neutral, Energy::Ok, Stress::Low, at).id(id)
    }

    #[tokio::test]
    async fn test_add_keeps_newest_first() {
        let store = EventStore::in_memory();
        store.add_meal(meal("a", ts(10, 12))).await.unwrap();
        store.add_meal(meal("b", ts(12, 12))).await.unwrap();
        store.add_meal(meal("c", ts(11, 12))).await.unwrap();

        let ids: Vec<String> = store.meals().await.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = EventStore::in_memory();
        store.add_mood(mood("x", ts(10, 9))).await.unwrap();
        let err = store.add_mood(mood("x", ts(11, 9))).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = EventStore::in_memory();
        store.add_meal(meal("a", ts(10, 12))).await.unwrap();

        let edited = meal("a", ts(10, 13)).notes("moved");
        store.update_meal(edited).await.unwrap();
        let stored = store.get_meal("a").await.unwrap();
        assert_eq!(stored.occurred_at, ts(10, 13));
        assert_eq!(stored.notes.as_deref(), Some("moved"));

        store.delete_meal("a").await.unwrap();
        assert!(store.get_meal("a").await.is_none());
        assert!(matches!(
            store.delete_meal("a").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update_mood(mood("missing", ts(1, 1))).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_window_queries() {
        let store = EventStore::in_memory();
        store.add_meal(meal("old", ts(1, 12))).await.unwrap();
        store.add_meal(meal("new", ts(14, 12))).await.unwrap();
        store.add_mood(mood("old", ts(1, 9))).await.unwrap();
        store.add_mood(mood("new", ts(14, 9))).await.unwrap();

        let window = TimeWindow::trailing_days(ts(15, 0), 7);
        let meals = store.meals_in(window).await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "new");

        let since = store.moods_since(ts(15, 0) - Duration::days(7)).await;
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].id, "new");
    }

    #[tokio::test]
    async fn test_persistence_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");

        {
            let store = EventStore::open(&path).await.unwrap();
            store.add_meal(meal("a", ts(10, 12))).await.unwrap();
            store.add_mood(mood("b", ts(10, 13))).await.unwrap();
        }

        let store = EventStore::open(&path).await.unwrap();
        let stats = store.stats().await;
        assert_eq!(stats.meal_count, 1);
        assert_eq!(stats.mood_count, 1);
        assert!(stats.persistent);

        store.clear().await.unwrap();
        let reopened = EventStore::open(&path).await.unwrap();
        assert_eq!(reopened.stats().await.meal_count, 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = EventStore::open(data_dir.join("events.json")).await.unwrap();
        store.add_meal(meal("a", ts(10, 12))).await.unwrap();
        store.add_mood(mood("m", ts(10, 13))).await.unwrap();

        // A regular file where the data directory should be makes every write fail
        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "not a directory").unwrap();

        assert!(store.add_meal(meal("b", ts(11, 12))).await.is_err());
        assert!(store
            .update_meal(meal("a", ts(12, 12)).notes("edited"))
            .await
            .is_err());
        assert!(store.delete_meal("a").await.is_err());
        assert!(store.add_mood(mood("n", ts(11, 13))).await.is_err());
        assert!(store.delete_mood("m").await.is_err());
        assert!(store.clear().await.is_err());
        assert!(store.replace_all(vec![], vec![]).await.is_err());

        let meals = store.meals().await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "a");
        assert_eq!(meals[0].occurred_at, ts(10, 12));
        assert_eq!(meals[0].notes, None);

        let moods = store.moods().await;
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].id, "m");
    }

    #[tokio::test]
    async fn test_unparsable_records_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"{
                "meals": [
                    {"id": "good", "created_at": "2024-01-10T12:00:00Z", "occurred_at": "2024-01-10T12:00:00Z", "meal_slot": "lunch", "meal_type_tags": []},
                    {"id": "bad", "created_at": "2024-01-10T12:00:00Z", "occurred_at": "yesterday-ish", "meal_slot": "lunch"}
                ],
                "moods": [
                    {"id": "m", "created_at": "2024-01-10T12:00:00Z", "occurred_at": "2024-01-10T13:00:00Z", "valence": "grumpy", "energy": "ok", "stress": "low"}
                ]
            }"#,
        )
        .unwrap();

        let store = EventStore::open(&path).await.unwrap();
        let stats = store.stats().await;
        assert_eq!(stats.meal_count, 1);
        assert_eq!(stats.mood_count, 0);
        assert_eq!(stats.skipped_records, 2);

        let meals = store.meals().await;
        assert_eq!(meals[0].meal_type_tags, vec![MealTag::Unknown]);
    }
}
