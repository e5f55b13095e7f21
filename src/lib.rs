//! # mealmood
//!
//! Meal & Mood Journal - log meals and mood check-ins, and surface weekly
//! behavioral patterns between them.
//!
//! ## Features
//!
//! - **Event log**: JSON-file backed meal and mood history
//! - **Pattern engine**: Four detectors over a trailing window, each with
//!   confidence, severity and evidence
//! - **Weekly report**: Data gating, ranking and top-N selection
//! - **Reminders**: Daily reminder times learned from meal history
//! - **REST API**: Axum server for the mobile client
//!
//! ## Modules
//!
//! - [`events`]: Event types and the event store
//! - [`patterns`]: Detectors, segmentation and the pattern engine
//! - [`report`]: Weekly report gating and ranking
//! - [`reminders`]: Reminder time planning
//! - [`summary`]: One-line meal summaries
//! - [`seed`]: Demo data
//! - [`export`]: JSON and CSV export
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{Duration, FixedOffset, Utc};
//! use mealmood::events::{EventStore, MealEvent, MealSlot, MealTag};
//! use mealmood::patterns::PatternEngine;
//! use mealmood::report::{build_weekly_report, GatingPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EventStore::open("events.json").await?;
//!
//!     store
//!         .add_meal(MealEvent::new(
//!             MealSlot::Dinner,
//!             Utc::now() - Duration::hours(2),
//!             vec![MealTag::Heavy, MealTag::FriedGreasy],
//!         ))
//!         .await?;
//!
//!     let engine = PatternEngine::new(FixedOffset::east_opt(0).unwrap());
//!     let report = build_weekly_report(&store, &engine, &GatingPolicy::default()).await;
//!
//!     println!("{:?}: {} patterns", report.status, report.patterns.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod events;
pub mod export;
pub mod patterns;
pub mod reminders;
pub mod report;
pub mod seed;
pub mod summary;

pub use config::Config;
pub use events::{EventSource, EventStore, MealEvent, MoodEvent, TimeWindow};
pub use patterns::{Pattern, PatternEngine, PatternType};
pub use report::{build_weekly_report, GatingPolicy, WeeklyReport};
