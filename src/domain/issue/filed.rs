//! Result of a successful filing.

use serde::{Deserialize, Serialize};

/// A created issue, used only to build the confirmation reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiledIssue {
    pub id_readable: String,
    pub link: String,
}

impl FiledIssue {
    /// Builds the deep link `{tracker_base_url}/issue/{id_readable}`.
    pub fn new(tracker_base_url: &str, id_readable: impl Into<String>) -> Self {
        let id_readable = id_readable.into();
        let link = format!("{}/issue/{}", tracker_base_url.trim_end_matches('/'), id_readable);
        Self { id_readable, link }
    }

    /// Confirmation line appended to the model's reply.
    pub fn confirmation(&self) -> String {
        format!("Created {}: {}", self.id_readable, self.link)
    }
}
