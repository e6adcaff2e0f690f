//! Structured logging for the HTTP service.
//!
//! Read from `LOG_FORMAT` (`json` by default, or `text`), `RUST_LOG`
//! (filter directive, default `info`) and `SERVICE_NAME`.
//!
//! ```no_run
//! use rentdesk_service_shared::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_env()).expect("logging already initialized");
//! ```

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

/// `text` and `pretty` select text output; anything else is JSON.
impl FromStr for LogFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        })
    }
}

/// Logging settings for the service binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: DEFAULT_LEVEL.to_string(),
            service: None,
        }
    }
}

const DEFAULT_LEVEL: &str = "info";

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            format: lookup("LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            level: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            service: lookup("SERVICE_NAME").filter(|v| !v.is_empty()),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// Install the global tracing subscriber.
///
/// JSON lines look like
/// `{"timestamp":"...","level":"INFO","fields":{"message":"listening on",...},"target":"rentdesk_service"}`;
/// text output uses the multi-line pretty formatter.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let (text, json) = match config.format {
        LogFormat::Text => (Some(fmt::layer().pretty()), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_current_span(false).with_span_list(false)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()?;

    if let Some(service) = &config.service {
        tracing::info!(service = %service, format = ?config.format, "logging initialized");
    }
    Ok(())
}
