//! mealmood REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Meals
//! - `GET /api/v1/meals` - List meals (`?days=N&limit=M`)
//! - `POST /api/v1/meals` - Log a meal
//! - `GET /api/v1/meals/:id` - Get a meal
//! - `PUT /api/v1/meals/:id` - Edit a meal
//! - `DELETE /api/v1/meals/:id` - Delete a meal
//!
//! ## Moods
//! - `GET /api/v1/moods`, `POST /api/v1/moods`
//! - `GET|PUT|DELETE /api/v1/moods/:id`
//!
//! ## Event log
//! - `DELETE /api/v1/events` - Clear all history
//! - `POST /api/v1/seed` - Load a week of demo data
//! - `GET /api/v1/export?format=json|csv` - Export history
//!
//! ## Analysis
//! - `GET /api/v1/patterns?days=N` - Raw engine output
//! - `GET /api/v1/patterns/weekly` - Weekly report
//! - `GET /api/v1/reminders` - Planned reminder times
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use mealmood::api::{serve, AppState};
//! use mealmood::config::Config;
//! use mealmood::events::EventStore;
//! use mealmood::patterns::PatternEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = Arc::new(EventStore::open(config.store.path()).await?);
//!     let engine = PatternEngine::new(config.analysis.tz());
//!
//!     serve(AppState::new(store, engine, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Meal routes
        .route(
            "/meals",
            get(routes::meals::list_meals).post(routes::meals::create_meal),
        )
        .route(
            "/meals/:id",
            get(routes::meals::get_meal)
                .put(routes::meals::update_meal)
                .delete(routes::meals::delete_meal),
        )
        // Mood routes
        .route(
            "/moods",
            get(routes::moods::list_moods).post(routes::moods::create_mood),
        )
        .route(
            "/moods/:id",
            get(routes::moods::get_mood)
                .put(routes::moods::update_mood)
                .delete(routes::moods::delete_mood),
        )
        // Event log routes
        .route("/events", delete(routes::events::clear_events))
        .route("/seed", post(routes::events::seed_events))
        .route("/export", get(routes::export::export_data))
        // Analysis routes
        .route("/patterns", get(routes::patterns::list_patterns))
        .route("/patterns/weekly", get(routes::patterns::weekly_report))
        .route("/reminders", get(routes::reminders::get_reminders));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.api.cors_origins);
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .with_state(shared_state)
}

/// Allow the configured origins, or any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("mealmood API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("mealmood API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
