//! Chat platform configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::{check_http_url, check_secret, ValidationError};

/// Zulip connection and trigger configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Server URL
    #[serde(default)]
    pub url: String,

    /// Bot account email
    #[serde(default)]
    pub email: String,

    /// Bot API key
    pub api_key: Option<Secret<String>>,

    /// Stream whose messages start the issue flow
    #[serde(default = "default_trigger_stream")]
    pub trigger_stream: String,

    /// Topic whose messages start the issue flow
    #[serde(default = "default_trigger_topic")]
    pub trigger_topic: String,

    /// Delay before polling again after a transport error
    #[serde(default = "default_poll_retry")]
    pub poll_retry_secs: u64,
}

impl ChatConfig {
    pub fn poll_retry(&self) -> Duration {
        Duration::from_secs(self.poll_retry_secs)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_http_url(&self.url, "CHAT__URL")?;
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CHAT__EMAIL"));
        }
        check_secret(self.api_key.as_ref(), "CHAT__API_KEY")?;
        if self.trigger_stream.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CHAT__TRIGGER_STREAM"));
        }
        if self.trigger_topic.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CHAT__TRIGGER_TOPIC"));
        }
        if self.poll_retry_secs == 0 {
            return Err(ValidationError::ZeroLimit("CHAT__POLL_RETRY_SECS"));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            email: String::new(),
            api_key: None,
            trigger_stream: default_trigger_stream(),
            trigger_topic: default_trigger_topic(),
            poll_retry_secs: default_poll_retry(),
        }
    }
}

fn default_trigger_stream() -> String {
    "youtrack".to_string()
}

fn default_trigger_topic() -> String {
    "create issue".to_string()
}

fn default_poll_retry() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ChatConfig {
        ChatConfig {
            url: "https://chat.example.com".to_string(),
            email: "bot@example.com".to_string(),
            api_key: Some(Secret::new("key".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_chat_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.trigger_stream, "youtrack");
        assert_eq!(config.trigger_topic, "create issue");
        assert_eq!(config.poll_retry(), Duration::from_secs(5));
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let config = ChatConfig {
            api_key: None,
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("CHAT__API_KEY"))
        );
    }

    #[test]
    fn test_url_must_be_http() {
        let config = ChatConfig {
            url: "chat.example.com".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUrl("CHAT__URL")));
    }
}
