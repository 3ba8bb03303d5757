//! Language-model provider configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::{check_http_url, check_timeout, has_secret, ValidationError};

/// Upper bound for `max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the chat-completions endpoint. Without one, drafts are
    /// built heuristically from the message text.
    pub api_key: Option<Secret<String>>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Endpoint base URL (OpenRouter by default)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OpenRouter attribution: `HTTP-Referer` header
    pub http_referer: Option<String>,

    /// OpenRouter attribution: `X-Title` header
    pub app_title: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature for dialogue turns
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when a non-blank API key is set.
    pub fn has_api_key(&self) -> bool {
        has_secret(self.api_key.as_ref())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        check_http_url(&self.base_url, "AI__BASE_URL")?;
        check_timeout(self.timeout_secs, "AI__TIMEOUT_SECS")?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::ZeroLimit("AI__MAX_TOKENS"));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::AboveLimit {
                field: "AI__MAX_RETRIES",
                max: MAX_RETRIES,
            });
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            http_referer: None,
            app_title: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    crate::adapters::ai::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    1200
}
