//! Conversation memory and project catalog configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Conversation store and catalog settings
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Turns kept per conversation
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Idle conversations are forgotten after this many seconds
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,

    /// YAML file listing tracker projects
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

impl ConversationConfig {
    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_limit == 0 {
            return Err(ValidationError::ZeroLimit("CONVERSATION__HISTORY_LIMIT"));
        }
        if self.idle_ttl_secs == 0 {
            return Err(ValidationError::ZeroLimit("CONVERSATION__IDLE_TTL_SECS"));
        }
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("CONVERSATION__CATALOG_PATH"));
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            idle_ttl_secs: default_idle_ttl(),
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_history_limit() -> usize {
    crate::adapters::storage::DEFAULT_HISTORY_LIMIT
}

fn default_idle_ttl() -> u64 {
    crate::adapters::storage::DEFAULT_IDLE_TTL_SECS
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("projects.yaml")
}
