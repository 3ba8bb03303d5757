//! A single catalog entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// One tracker project the assistant may file into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCatalogEntry {
    /// Tracker-internal project id (e.g. "0-4").
    pub id: String,
    /// Short key shown in readable issue ids (e.g. "APP").
    pub key: String,
    /// Human-readable project name.
    pub name: String,
    /// Guidance for when this project is the right target.
    #[serde(default)]
    pub description: String,
}

impl ProjectCatalogEntry {
    /// Creates an entry, rejecting blank identifiers.
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let entry = Self {
            id: id.into().trim().to_string(),
            key: key.into().trim().to_string(),
            name: name.into().trim().to_string(),
            description: description.into().trim().to_string(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Checks that id, key and name are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if self.key.trim().is_empty() {
            return Err(ValidationError::empty_field("key"));
        }
        if self.key.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("key", "contains whitespace"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(())
    }

    /// Label used in previews, e.g. `APP (Mobile App)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.key, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_fields() {
        let entry = ProjectCatalogEntry::new(" 0-1 ", "APP ", " Mobile App", "apps").unwrap();
        assert_eq!(entry.id, "0-1");
        assert_eq!(entry.key, "APP");
        assert_eq!(entry.name, "Mobile App");
    }

    #[test]
    fn new_rejects_blank_key() {
        let err = ProjectCatalogEntry::new("0-1", "  ", "Mobile App", "").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("key"));
    }

    #[test]
    fn new_rejects_key_with_whitespace() {
        assert!(ProjectCatalogEntry::new("0-1", "MOB APP", "Mobile App", "").is_err());
    }

    #[test]
    fn label_combines_key_and_name() {
        let entry = ProjectCatalogEntry::new("0-1", "APP", "Mobile App", "").unwrap();
        assert_eq!(entry.label(), "APP (Mobile App)");
    }
}
