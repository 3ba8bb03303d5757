//! Issue tracker configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::{check_http_url, check_timeout, has_secret, ValidationError};

/// YouTrack connection configuration.
///
/// Both `url` and `token` are needed to file issues. Without them the issue
/// flow replies that the tracker is not configured.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Instance URL, also the base of issue links
    #[serde(default)]
    pub url: String,

    /// Permanent token
    pub token: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TrackerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when both the URL and a non-blank token are set.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && has_secret(self.token.as_ref())
    }

    /// Validate tracker configuration. A set URL must be http(s).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.trim().is_empty() {
            check_http_url(&self.url, "TRACKER__URL")?;
        }
        check_timeout(self.timeout_secs, "TRACKER__TIMEOUT_SECS")
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_needs_url_and_token() {
        let mut config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_configured());

        config.url = "https://example.youtrack.cloud".to_string();
        assert!(!config.is_configured());

        config.token = Some(Secret::new("perm:xxx".to_string()));
        assert!(config.validate().is_ok());
        assert!(config.is_configured());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_set_url_must_be_http() {
        let config = TrackerConfig {
            url: "example.youtrack.cloud".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidUrl("TRACKER__URL"))
        );
    }
}
