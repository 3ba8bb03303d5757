//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `ISSUE_SCRIBE` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use issue_scribe::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on {} / {}", config.chat.trigger_stream, config.chat.trigger_topic);
//! ```

mod ai;
mod chat;
mod conversation;
mod error;
mod logging;
mod tracker;

pub use ai::AiConfig;
pub use chat::ChatConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use tracker::TrackerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Chat platform connection and trigger (Zulip)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Language-model provider (OpenAI-compatible)
    #[serde(default)]
    pub ai: AiConfig,

    /// Issue tracker (YouTrack)
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Conversation memory and project catalog
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ISSUE_SCRIBE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ISSUE_SCRIBE__CHAT__URL=https://chat.example.com` -> `chat.url`
    /// - `ISSUE_SCRIBE__AI__TIMEOUT_SECS=90` -> `ai.timeout_secs = 90`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ISSUE_SCRIBE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.chat.validate()?;
        self.ai.validate()?;
        self.tracker.validate()?;
        self.conversation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const REQUIRED: [(&str, &str); 6] = [
        ("ISSUE_SCRIBE__CHAT__URL", "https://chat.example.com"),
        ("ISSUE_SCRIBE__CHAT__EMAIL", "scribe-bot@example.com"),
        ("ISSUE_SCRIBE__CHAT__API_KEY", "zulip-key"),
        ("ISSUE_SCRIBE__AI__API_KEY", "sk-or-xxx"),
        ("ISSUE_SCRIBE__TRACKER__URL", "https://example.youtrack.cloud"),
        ("ISSUE_SCRIBE__TRACKER__TOKEN", "perm:xxx"),
    ];

    const OPTIONAL: [&str; 3] = [
        "ISSUE_SCRIBE__AI__TIMEOUT_SECS",
        "ISSUE_SCRIBE__CHAT__TRIGGER_TOPIC",
        "ISSUE_SCRIBE__LOGGING__JSON",
    ];

    fn set_minimal_env() {
        for (key, value) in REQUIRED {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in REQUIRED {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.chat.url, "https://chat.example.com");
        assert_eq!(config.chat.email, "scribe-bot@example.com");
        assert_eq!(
            config.tracker.token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("perm:xxx")
        );
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.chat.trigger_stream, "youtrack");
        assert_eq!(config.chat.trigger_topic, "create issue");
        assert_eq!(config.ai.timeout_secs, 60);
        assert_eq!(config.tracker.timeout_secs, 30);
        assert_eq!(config.conversation.history_limit, 16);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ISSUE_SCRIBE__AI__TIMEOUT_SECS", "90");
        env::set_var("ISSUE_SCRIBE__CHAT__TRIGGER_TOPIC", "bugs");
        env::set_var("ISSUE_SCRIBE__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.timeout_secs, 90);
        assert_eq!(config.chat.trigger_topic, "bugs");
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_secrets_fail_validation() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
