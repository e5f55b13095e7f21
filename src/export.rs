//! Event export
//!
//! Dumps the whole event history as pretty JSON (`{"meals": [...], "moods": [...]}`)
//! or as a single CSV with one row per event, oldest first.

use crate::events::{MealEvent, MoodEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    exported_at: DateTime<Utc>,
    meals: &'a [MealEvent],
    moods: &'a [MoodEvent],
}

/// One flattened CSV row; meal-only and mood-only columns stay empty
#[derive(Serialize, Default)]
struct CsvRow<'a> {
    kind: &'static str,
    id: &'a str,
    occurred_at: String,
    created_at: String,
    meal_slot: &'a str,
    meal_type_tags: String,
    text_description: &'a str,
    valence: String,
    energy: String,
    stress: String,
    mood_tag: String,
    notes: &'a str,
}

/// Render a serde enum as its wire label ("high_sugar")
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

impl<'a> CsvRow<'a> {
    fn meal(meal: &'a MealEvent) -> Self {
        Self {
            kind: "meal",
            id: &meal.id,
            occurred_at: meal.occurred_at.to_rfc3339(),
            created_at: meal.created_at.to_rfc3339(),
            meal_slot: meal.meal_slot.as_str(),
            meal_type_tags: meal
                .meal_type_tags
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            text_description: meal.text_description.as_deref().unwrap_or(""),
            notes: meal.notes.as_deref().unwrap_or(""),
            ..Default::default()
        }
    }

    fn mood(mood: &'a MoodEvent) -> Self {
        Self {
            kind: "mood",
            id: &mood.id,
            occurred_at: mood.occurred_at.to_rfc3339(),
            created_at: mood.created_at.to_rfc3339(),
            valence: label(&mood.valence),
            energy: label(&mood.energy),
            stress: label(&mood.stress),
            mood_tag: mood.tag.as_ref().map(label).unwrap_or_default(),
            notes: mood.notes.as_deref().unwrap_or(""),
            ..Default::default()
        }
    }
}

pub fn export_json(
    meals: &[MealEvent],
    moods: &[MoodEvent],
    exported_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let body = JsonExport {
        exported_at,
        meals,
        moods,
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

pub fn export_csv(meals: &[MealEvent], moods: &[MoodEvent]) -> Result<String, ExportError> {
    let mut rows: Vec<(DateTime<Utc>, CsvRow)> = meals
        .iter()
        .map(|m| (m.occurred_at, CsvRow::meal(m)))
        .chain(moods.iter().map(|m| (m.occurred_at, CsvRow::mood(m))))
        .collect();
    rows.sort_by_key(|(at, _)| *at);

    let mut writer = csv::Writer::from_writer(Vec::new());
    for (_, row) in &rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// Export in the requested format
pub fn export_events(
    format: ExportFormat,
    meals: &[MealEvent],
    moods: &[MoodEvent],
    exported_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    tracing::debug!(
        format = format.extension(),
        meals = meals.len(),
        moods = moods.len(),
        "Exporting events"
    );

    match format {
        ExportFormat::Json => export_json(meals, moods, exported_at),
        ExportFormat::Csv => export_csv(meals, moods),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Energy, MealSlot, MealTag, MoodTag, Stress, Valence};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    fn fixtures() -> (Vec<MealEvent>, Vec<MoodEvent>) {
        let meals = vec![MealEvent::new(
            MealSlot::Snack,
            at(15),
            vec![MealTag::HighSugar, MealTag::Sweet],
        )
        .id("meal-1")
        .description("cookies, two")];
        let moods = vec![
            MoodEvent::new(Valence::Negative, Energy::Low, Stress::High, at(14))
                .id("mood-1")
                .tag(MoodTag::Anxious),
        ];
        (meals, moods)
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_rows_are_chronological() {
        let (meals, moods) = fixtures();
        let csv = export_csv(&meals, &moods).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("kind,id,occurred_at"));
        assert!(lines[1].starts_with("mood,mood-1,"));
        assert!(lines[1].contains("negative,low,high,anxious"));
        assert!(lines[2].starts_with("meal,meal-1,"));
        assert!(lines[2].contains("high_sugar;sweet"));
        // Embedded comma is quoted
        assert!(lines[2].contains("\"cookies, two\""));
    }

    #[test]
    fn test_json_export_shape() {
        let (meals, moods) = fixtures();
        let json = export_json(&meals, &moods, at(16)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meals"][0]["id"], "meal-1");
        assert_eq!(value["moods"][0]["valence"], "negative");
        assert_eq!(value["exported_at"], "2024-01-15T16:00:00Z");
    }

    #[test]
    fn test_empty_csv_has_no_rows() {
        let csv = export_csv(&[], &[]).unwrap();
        assert!(csv.is_empty());
    }
}
