//! Project reference as suggested by the language model.

use serde::{Deserialize, Serialize};

/// The project fields of a draft. Any subset may be filled; blanks mean
/// "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHint {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl ProjectHint {
    pub fn new(id: impl Into<String>, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            key: key.into().trim().to_string(),
            name: name.into().trim().to_string(),
        }
    }

    /// A hint carrying only a key.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self::new("", key, "")
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.key.is_empty() && self.name.is_empty()
    }

    /// Non-empty candidates in precedence order: id, key, name.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        [self.id.as_str(), self.key.as_str(), self.name.as_str()]
            .into_iter()
            .filter(|candidate| !candidate.is_empty())
    }

    /// The most specific raw value, shown when resolution fails.
    pub fn raw(&self) -> Option<&str> {
        self.candidates().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_skip_blanks_and_keep_order() {
        let hint = ProjectHint::new("", "APP", "Mobile App");
        let candidates: Vec<&str> = hint.candidates().collect();
        assert_eq!(candidates, vec!["APP", "Mobile App"]);
        assert_eq!(hint.raw(), Some("APP"));
    }

    #[test]
    fn blank_hint_is_empty() {
        let hint = ProjectHint::new(" ", "", "\t");
        assert!(hint.is_empty());
        assert_eq!(hint.raw(), None);
    }
}
