//! Structured logging setup for the evacuation service.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text` (`pretty` is accepted as an alias)
//! - `RUST_LOG`: level filter (default: `info`)

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Text,
}

impl LogFormat {
    /// Unrecognised values fall back to JSON.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("LOG_FORMAT").ok().as_deref(),
            std::env::var("RUST_LOG").ok().as_deref(),
        )
    }

    fn from_vars(format: Option<&str>, level: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            format: format.map(LogFormat::parse).unwrap_or(defaults.format),
            level: level
                .filter(|level| !level.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.level),
        }
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init(),
    }
}
