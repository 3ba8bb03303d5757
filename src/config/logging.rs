//! Logging configuration and subscriber setup

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Filter from `RUST_LOG` when set, else from `level`.
    pub fn env_filter(&self) -> Result<EnvFilter, ValidationError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| ValidationError::InvalidLogFilter(e.to_string())),
        }
    }

    /// Validate logging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidLogFilter(e.to_string()))
    }

    /// Install the global subscriber. Later calls are no-ops.
    pub fn init(&self) -> Result<(), ValidationError> {
        let filter = self.env_filter()?;
        let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

        let installed = if self.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if installed.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info,issue_scribe=debug".to_string()
}
