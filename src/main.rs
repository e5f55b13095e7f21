//! mealmood API Server
//!
//! Run with: cargo run --bin mealmood
//!
//! # Configuration
//!
//! Reads `config.toml` from the default locations (see `mealmood-cli config`)
//! or the path given with `--config`. Environment variables:
//! - `MEALMOOD_DATA_DIR`: Directory holding the event log
//! - `MEALMOOD_API_HOST` / `MEALMOOD_API_PORT`: Bind address
//! - `MEALMOOD_UTC_OFFSET_MINUTES`: Offset for local-time classification
//! - `MEALMOOD_LOG_LEVEL` / `MEALMOOD_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log filter entirely

use clap::Parser;
use mealmood::api::{serve, AppState};
use mealmood::config::Config;
use mealmood::events::EventStore;
use mealmood::patterns::PatternEngine;
use mealmood::seed::generate_seed_data;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mealmood")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meal & mood journal API server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load demo data when the event log is empty
    #[arg(long)]
    seed_if_empty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    config.logging.init();

    tracing::info!("Starting mealmood API server v{}", env!("CARGO_PKG_VERSION"));

    let tz = config.analysis.tz();
    let store_path = config.store.path();
    tracing::info!(path = ?store_path, utc_offset_secs = tz.local_minus_utc(), "Opening event store");

    let store = Arc::new(EventStore::open(&store_path).await?);
    let engine = PatternEngine::new(tz);

    if args.seed_if_empty {
        let stats = store.stats().await;
        if stats.meal_count == 0 && stats.mood_count == 0 {
            let (meals, moods) = generate_seed_data(engine.now(), tz);
            store.replace_all(meals, moods).await?;
            tracing::info!("Empty event log seeded with demo data");
        }
    }

    tracing::info!("Store stats: {}", store.stats().await);

    let state = AppState::new(store, engine, config);
    serve(state).await?;

    tracing::info!("mealmood API server stopped");
    Ok(())
}
