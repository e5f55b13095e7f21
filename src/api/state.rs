//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::Config;
use crate::events::EventStore;
use crate::patterns::PatternEngine;
use crate::report::GatingPolicy;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Meal and mood history
    pub store: Arc<EventStore>,
    /// Pattern engine (clock, ids and offset baked in)
    pub engine: Arc<PatternEngine>,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<EventStore>, engine: PatternEngine, config: Config) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn gating_policy(&self) -> GatingPolicy {
        self.config.analysis.gating_policy()
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.api.host, self.config.api.port)
    }
}
