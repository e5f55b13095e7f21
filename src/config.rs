//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `MEALMOOD_*` environment overrides.

use crate::report::GatingPolicy;
use chrono::{FixedOffset, Local, Offset};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Event store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("mealmood").to_string_lossy().to_string())
        .unwrap_or_else(|| "./mealmood_data".to_string())
}

fn default_file_name() -> String {
    "events.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

impl StoreConfig {
    /// Full path of the event log file
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.file_name)
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8081".to_string(),
                "http://127.0.0.1:8081".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Pattern analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    #[serde(default = "default_min_meals")]
    pub min_meals: usize,

    #[serde(default = "default_min_moods")]
    pub min_moods: usize,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Offset east of UTC used for local-time classification.
    /// Unset means the machine's offset at startup.
    pub utc_offset_minutes: Option<i32>,
}

fn default_window_days() -> i64 {
    7
}

fn default_min_meals() -> usize {
    5
}

fn default_min_moods() -> usize {
    3
}

fn default_top_n() -> usize {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            min_meals: default_min_meals(),
            min_moods: default_min_moods(),
            top_n: default_top_n(),
            utc_offset_minutes: None,
        }
    }
}

impl AnalysisConfig {
    /// The configured offset, falling back to the local one
    pub fn tz(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    pub fn gating_policy(&self) -> GatingPolicy {
        GatingPolicy {
            window_days: self.window_days,
            min_meals: self.min_meals,
            min_moods: self.min_moods,
            top_n: self.top_n,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global subscriber. `RUST_LOG` wins over `level`.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("mealmood={},tower_http=info", self.level)));

        if self.format == "json" {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("mealmood").join("config.toml")),
            Some(PathBuf::from("/etc/mealmood/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("MEALMOOD_DATA_DIR") {
            self.store.data_dir = data_dir;
        }

        if let Ok(host) = std::env::var("MEALMOOD_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("MEALMOOD_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(offset) = std::env::var("MEALMOOD_UTC_OFFSET_MINUTES") {
            if let Ok(minutes) = offset.parse() {
                self.analysis.utc_offset_minutes = Some(minutes);
            }
        }

        if let Ok(level) = std::env::var("MEALMOOD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MEALMOOD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# mealmood configuration
#
# Environment variables override these settings:
# - MEALMOOD_DATA_DIR
# - MEALMOOD_API_HOST
# - MEALMOOD_API_PORT
# - MEALMOOD_UTC_OFFSET_MINUTES
# - MEALMOOD_LOG_LEVEL
# - MEALMOOD_LOG_FORMAT

[store]
# Directory holding the event log (defaults to the platform data dir)
# data_dir = "/var/lib/mealmood"

# Event log file name inside data_dir
file_name = "events.json"

[api]
host = "127.0.0.1"
port = 8090

# Allowed CORS origins
cors_origins = ["http://localhost:8081", "http://127.0.0.1:8081"]

# Request timeout in seconds
request_timeout_secs = 30

[analysis]
# Trailing window for the weekly report (days)
window_days = 7

# Minimum events in the window before patterns are shown
min_meals = 5
min_moods = 3

# Patterns kept in the weekly report
top_n = 3

# Offset east of UTC for hour/weekday classification.
# Leave unset to use this machine's offset.
# utc_offset_minutes = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
