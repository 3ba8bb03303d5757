//! Issue draft value object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::DraftValidationError;
use super::template::DescriptionTemplate;
use crate::domain::catalog::ProjectHint;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 80;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 800;

/// Issue type used when the model leaves it blank.
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// A structured, not-yet-filed issue proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub project: ProjectHint,
}

impl IssueDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        issue_type: impl Into<String>,
        project: ProjectHint,
    ) -> Self {
        Self {
            title: title.into().trim().to_string(),
            description: description.into().trim().to_string(),
            issue_type: issue_type.into().trim().to_string(),
            project,
        }
    }

    /// Reads a draft from a model-produced `issue` object.
    ///
    /// Non-string fields are treated as blank. `project_key` falls back to a
    /// bare `project` field.
    pub fn from_json(obj: &Map<String, Value>) -> Self {
        let field = |name: &str| obj.get(name).and_then(Value::as_str).unwrap_or("");
        let key = match field("project_key") {
            "" => field("project"),
            key => key,
        };
        Self::new(
            field("title"),
            field("description"),
            field("type"),
            ProjectHint::new(field("project_id"), key, field("project_name")),
        )
    }

    /// Serializes back into the flat shape the model uses.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "title": self.title,
            "description": self.description,
            "type": self.issue_type,
            "project_id": self.project.id,
            "project_key": self.project.key,
            "project_name": self.project.name,
        })
    }

    /// True when every field is empty.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.issue_type.is_empty()
            && self.project.is_empty()
    }

    /// Type label, defaulting to `Task`.
    pub fn type_or_default(&self) -> &str {
        if self.issue_type.is_empty() {
            DEFAULT_ISSUE_TYPE
        } else {
            &self.issue_type
        }
    }

    /// Checks length limits and the description template.
    pub fn validate(&self) -> Result<DescriptionTemplate, DraftValidationError> {
        if self.title.is_empty() {
            return Err(DraftValidationError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(DraftValidationError::TitleTooLong {
                max: MAX_TITLE_CHARS,
                actual: title_chars,
            });
        }
        let description_chars = self.description.chars().count();
        if description_chars > MAX_DESCRIPTION_CHARS {
            return Err(DraftValidationError::DescriptionTooLong {
                max: MAX_DESCRIPTION_CHARS,
                actual: description_chars,
            });
        }
        DescriptionTemplate::parse(&self.description)
    }
}
