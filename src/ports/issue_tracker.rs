//! Issue Tracker Port - Interface for filing issues.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors raised by issue trackers
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The tracker understood the request and refused it.
    #[error("tracker rejected the issue ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Network failure or server error.
    #[error("tracker unavailable: {0}")]
    Transport(String),

    #[error("tracker request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl TrackerError {
    /// Detail that is safe to show in chat.
    pub fn user_detail(&self) -> String {
        match self {
            TrackerError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

/// An issue to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub summary: String,
    pub description: String,
    /// Canonical tracker project id.
    pub project_id: String,
    /// Type label, e.g. `Task` or `Bug`.
    pub issue_type: Option<String>,
}

/// Tracker response for a created issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub id_readable: String,
    pub summary: String,
}

impl CreatedIssue {
    /// Readable id, falling back to the internal id.
    pub fn display_id(&self) -> &str {
        if self.id_readable.is_empty() {
            &self.id
        } else {
            &self.id_readable
        }
    }
}

/// Port for the issue tracker
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: NewIssue) -> Result<CreatedIssue, TrackerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_detail_is_the_tracker_message() {
        let err = TrackerError::Rejected {
            status: 400,
            message: "Unknown value for field Type".into(),
        };
        assert_eq!(err.user_detail(), "Unknown value for field Type");
        assert_eq!(
            TrackerError::Timeout { timeout_secs: 30 }.user_detail(),
            "tracker request timed out after 30s"
        );
    }

    #[test]
    fn display_id_falls_back_to_internal_id() {
        let issue = CreatedIssue {
            id: "2-17".into(),
            id_readable: String::new(),
            summary: "s".into(),
        };
        assert_eq!(issue.display_id(), "2-17");
    }
}
