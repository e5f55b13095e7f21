//! mealmood CLI
//!
//! Command-line interface working directly on the local event log:
//! - Log meals and moods
//! - Browse the timeline
//! - Show weekly patterns and reminder times
//! - Seed, clear and export data

use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use mealmood::config::{generate_default_config, Config, LoggingConfig};
use mealmood::events::{
    normalize_tags, parse_label, EventSource, EventStore, MealEvent, MealTag, MoodEvent,
    TimeWindow,
};
use mealmood::export::{export_events, ExportFormat};
use mealmood::patterns::{Pattern, PatternEngine};
use mealmood::reminders::plan_reminders;
use mealmood::report::{build_weekly_report, describe_segmentation};
use mealmood::seed::generate_seed_data;
use mealmood::summary::format_meal_summary;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mealmood-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meal & mood journal")]
#[command(long_about = "mealmood logs meals and moods and surfaces weekly behavioral patterns between them.\nAll commands work on the local event log.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a meal
    LogMeal {
        /// breakfast, lunch, dinner or snack
        slot: String,
        /// Meal-type tags, comma-separated (e.g. heavy,fried_greasy)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        /// When: "now", "HH:MM" today, "YYYY-MM-DD HH:MM" or RFC 3339
        #[arg(short, long, default_value = "now")]
        at: String,
        /// What you ate
        #[arg(short, long)]
        description: Option<String>,
        /// small, medium or large
        #[arg(short, long)]
        portion: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Log a mood check-in
    LogMood {
        /// negative, neutral or positive
        valence: String,
        /// low, ok or high
        energy: String,
        /// low, medium or high
        stress: String,
        /// anxious, bored, sad, angry, lonely or celebratory
        #[arg(short, long)]
        tag: Option<String>,
        /// When: "now", "HH:MM" today, "YYYY-MM-DD HH:MM" or RFC 3339
        #[arg(short, long, default_value = "now")]
        at: String,
        #[arg(short, long)]
        notes: Option<String>,
        /// Id of the meal this mood belongs to
        #[arg(short, long)]
        meal: Option<String>,
    },

    /// Show recent meals and moods
    Timeline {
        /// How many days back
        #[arg(short, long, default_value = "7")]
        days: i64,
    },

    /// Show weekly patterns
    Patterns {
        /// Every detected pattern over the whole history, unranked and ungated
        #[arg(long)]
        all: bool,
    },

    /// Show planned daily reminder times
    Reminders,

    /// Show event log status
    Status,

    /// Replace the event log with a week of demo data
    Seed,

    /// Delete every meal and mood
    Clear {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },

    /// Export the event log
    Export {
        /// json or csv
        #[arg(long, default_value = "json")]
        as_format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    // Quiet unless RUST_LOG says otherwise
    LoggingConfig {
        level: "warn".to_string(),
        ..config.logging.clone()
    }
    .init();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let tz = config.analysis.tz();
    let store = EventStore::open(config.store.path())
        .await
        .context("Failed to open event log")?;
    let engine = PatternEngine::new(tz);
    let json = cli.format == "json";

    match cli.command {
        Commands::LogMeal {
            slot,
            tags,
            at,
            description,
            portion,
            notes,
        } => {
            let slot = parse_label(&slot).map_err(anyhow::Error::msg)?;
            let tags = tags
                .iter()
                .map(|t| parse_label::<MealTag>(t))
                .collect::<Result<Vec<_>, _>>()
                .map_err(anyhow::Error::msg)?;
            let occurred_at = parse_when(&at, Utc::now(), tz)?;

            let mut meal = MealEvent::new(slot, occurred_at, normalize_tags(tags));
            if let Some(text) = description {
                meal = meal.description(text);
            }
            if let Some(portion) = portion {
                meal = meal.portion(parse_label(&portion).map_err(anyhow::Error::msg)?);
            }
            if let Some(notes) = notes {
                meal = meal.notes(notes);
            }

            store.add_meal(meal.clone()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&meal)?);
            } else {
                println!(
                    "Logged {} at {} ({})",
                    format_meal_summary(&meal),
                    meal.local_time(tz).format("%Y-%m-%d %H:%M"),
                    meal.id
                );
            }
        }

        Commands::LogMood {
            valence,
            energy,
            stress,
            tag,
            at,
            notes,
            meal,
        } => {
            let occurred_at = parse_when(&at, Utc::now(), tz)?;
            let mut mood = MoodEvent::new(
                parse_label(&valence).map_err(anyhow::Error::msg)?,
                parse_label(&energy).map_err(anyhow::Error::msg)?,
                parse_label(&stress).map_err(anyhow::Error::msg)?,
                occurred_at,
            );
            if let Some(tag) = tag {
                mood = mood.tag(parse_label(&tag).map_err(anyhow::Error::msg)?);
            }
            if let Some(notes) = notes {
                mood = mood.notes(notes);
            }
            if let Some(meal_id) = meal {
                if store.get_meal(&meal_id).await.is_none() {
                    bail!("No meal with id {}", meal_id);
                }
                mood = mood.linked_meal(meal_id);
            }

            store.add_mood(mood.clone()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&mood)?);
            } else {
                println!(
                    "Logged mood at {} ({})",
                    mood.occurred_at.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
                    mood.id
                );
            }
        }

        Commands::Timeline { days } => {
            if days <= 0 {
                bail!("--days must be positive");
            }
            let start = TimeWindow::trailing_days(Utc::now(), days).start;
            let meals = store.meals_since(start).await;
            let moods = store.moods_since(start).await;

            if json {
                let body = serde_json::json!({ "meals": meals, "moods": moods });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print_timeline(&meals, &moods, tz);
            }
        }

        Commands::Patterns { all } => {
            if all {
                let meals = store.meals().await;
                let moods = store.moods().await;
                let patterns = engine.run_concurrent(&meals, &moods).await;

                if json {
                    println!("{}", serde_json::to_string_pretty(&patterns)?);
                } else if patterns.is_empty() {
                    println!("No patterns detected.");
                } else {
                    patterns.iter().for_each(print_pattern);
                }
            } else {
                let policy = config.analysis.gating_policy();
                let report = build_weekly_report(&store, &engine, &policy).await;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("Weekly Patterns");
                    println!(
                        "{} meals, {} moods in the last {} days",
                        report.meal_count, report.mood_count, policy.window_days
                    );
                    println!();
                    if let Some(message) = &report.message {
                        println!("{}", message);
                    }
                    report.patterns.iter().for_each(print_pattern);
                }
            }
        }

        Commands::Reminders => {
            let meals = store.all_meals().await;
            let reminders = plan_reminders(&meals, tz);

            if json {
                println!("{}", serde_json::to_string_pretty(&reminders)?);
            } else {
                println!("Daily reminders");
                println!("{}", "-".repeat(40));
                for reminder in &reminders {
                    println!("{}", reminder);
                }
            }
        }

        Commands::Status => {
            let stats = store.stats().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("mealmood v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Event log: {:?}", config.store.path());
                println!("  Meals: {}", stats.meal_count);
                println!("  Moods: {}", stats.mood_count);
                if stats.skipped_records > 0 {
                    println!("  Unreadable records skipped: {}", stats.skipped_records);
                }
                println!("UTC offset: {}", tz);
            }
        }

        Commands::Seed => {
            let (meals, moods) = generate_seed_data(Utc::now(), tz);
            let (meal_count, mood_count) = (meals.len(), moods.len());
            store.replace_all(meals, moods).await?;
            println!("Seeded {} meals and {} moods", meal_count, mood_count);
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete all events without --yes");
            }
            let stats = store.stats().await;
            store.clear().await?;
            println!(
                "Deleted {} meals and {} moods",
                stats.meal_count, stats.mood_count
            );
        }

        Commands::Export { as_format, output } => {
            let format: ExportFormat = as_format.parse().map_err(anyhow::Error::msg)?;
            let meals = store.meals().await;
            let moods = store.moods().await;
            let data = export_events(format, &meals, &moods, Utc::now())?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported to {:?}", path);
                }
                None => print!("{}", data),
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Parse a user-supplied time: "now", "HH:MM" (today, local), "YYYY-MM-DD HH:MM" (local)
/// or RFC 3339
fn parse_when(s: &str, now: DateTime<Utc>, tz: FixedOffset) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let local = if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        Some(dt)
    } else if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        let today: NaiveDate = now.with_timezone(&tz).date_naive();
        Some(today.and_time(time))
    } else {
        None
    };

    local
        .and_then(|dt| dt.and_local_timezone(tz).single())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid time: {}. Use now, HH:MM, YYYY-MM-DD HH:MM or RFC 3339", s))
}

fn print_timeline(meals: &[MealEvent], moods: &[MoodEvent], tz: FixedOffset) {
    if meals.is_empty() && moods.is_empty() {
        println!("Nothing logged yet.");
        println!();
        println!("Log your first meal with:");
        println!("  mealmood-cli log-meal lunch --tags regular,homemade");
        return;
    }

    let mut rows: Vec<(DateTime<Utc>, String)> = meals
        .iter()
        .map(|m| (m.occurred_at, format_meal_summary(m)))
        .chain(moods.iter().map(|m| {
            let label = format!(
                "Mood • {:?} • energy {:?} • stress {:?}",
                m.valence, m.energy, m.stress
            );
            (m.occurred_at, label)
        }))
        .collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0));

    println!("{:<17} {}", "When", "Entry");
    println!("{}", "-".repeat(60));
    for (at, label) in rows {
        println!("{:<17} {}", at.with_timezone(&tz).format("%Y-%m-%d %H:%M"), label);
    }
}

fn print_pattern(pattern: &Pattern) {
    let severity = pattern
        .severity
        .map(|s| format!(", {} severity", s))
        .unwrap_or_default();

    println!("{}  [{} confidence{}]", pattern.title, pattern.confidence, severity);
    println!("  {}", pattern.description);
    if let Some(label) = pattern.segmentation.as_ref().and_then(describe_segmentation) {
        println!("  {}", label);
    }
    println!();
}
