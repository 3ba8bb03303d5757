//! Catalog table and resolver.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::entry::ProjectCatalogEntry;
use super::errors::{CatalogError, ResolutionError};
use super::hint::ProjectHint;

/// Read-only catalog of candidate projects, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCatalog {
    entries: Vec<ProjectCatalogEntry>,
}

/// Resolution strength, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchTier {
    Id,
    Key,
    Name,
    NameContains,
}

impl MatchTier {
    const ALL: [MatchTier; 4] = [
        MatchTier::Id,
        MatchTier::Key,
        MatchTier::Name,
        MatchTier::NameContains,
    ];
}

/// On-disk layout of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    projects: Vec<ProjectCatalogEntry>,
}

impl ProjectCatalog {
    /// Builds a catalog, rejecting empty tables, invalid entries and
    /// duplicate ids or keys (keys compare case-insensitively).
    pub fn from_entries(entries: Vec<ProjectCatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        let mut keys = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            entry
                .validate()
                .map_err(|source| CatalogError::InvalidEntry { index, source })?;
            if !ids.insert(entry.id.clone()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            if !keys.insert(entry.key.to_lowercase()) {
                return Err(CatalogError::DuplicateKey(entry.key.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// Parses a YAML document with a top-level `projects` list.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_entries(file.projects)
    }

    /// Loads the catalog from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn entries(&self) -> &[ProjectCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by canonical id.
    pub fn get(&self, id: &str) -> Option<&ProjectCatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Resolves a single free-form reference.
    ///
    /// Order: exact id, key (case-insensitive), name (case-insensitive), then
    /// the first entry whose name contains the reference (case-insensitive).
    pub fn resolve_project_id(&self, hint: &str) -> Result<&ProjectCatalogEntry, ResolutionError> {
        let hint = hint.trim();
        if hint.is_empty() {
            return Err(ResolutionError::NoHint);
        }
        MatchTier::ALL
            .iter()
            .find_map(|tier| self.find(*tier, hint))
            .ok_or_else(|| ResolutionError::NotFound(hint.to_string()))
    }

    /// Resolves the structured hint of a draft.
    ///
    /// Match tiers are applied across all fields before falling to the next
    /// tier, so an exact key or name always beats a substring match on another
    /// field. Within a tier, fields are tried as id, key, name.
    pub fn resolve_hint(&self, hint: &ProjectHint) -> Result<&ProjectCatalogEntry, ResolutionError> {
        let raw = hint.raw().ok_or(ResolutionError::NoHint)?;
        MatchTier::ALL
            .iter()
            .find_map(|tier| hint.candidates().find_map(|candidate| self.find(*tier, candidate)))
            .ok_or_else(|| ResolutionError::NotFound(raw.to_string()))
    }

    fn find(&self, tier: MatchTier, candidate: &str) -> Option<&ProjectCatalogEntry> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }
        let lowered = candidate.to_lowercase();
        self.entries.iter().find(|entry| match tier {
            MatchTier::Id => entry.id == candidate,
            MatchTier::Key => entry.key.to_lowercase() == lowered,
            MatchTier::Name => entry.name.to_lowercase() == lowered,
            MatchTier::NameContains => entry.name.to_lowercase().contains(&lowered),
        })
    }

    /// Catalog rendered for the model prompt.
    pub fn to_prompt_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: &str, key: &str, name: &str) -> ProjectCatalogEntry {
        ProjectCatalogEntry::new(id, key, name, "").unwrap()
    }

    fn test_catalog() -> ProjectCatalog {
        ProjectCatalog::from_entries(vec![
            entry("0-1", "APP", "Mobile App"),
            entry("0-2", "BE", "Backend Services"),
            // Key collides with the id of the first entry: ids must win.
            entry("0-3", "0-1", "Ops"),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_by_id() {
        let catalog = test_catalog();
        assert_eq!(catalog.resolve_project_id("0-2").unwrap().key, "BE");
    }

    #[test]
    fn resolves_by_key_case_insensitively() {
        let catalog = test_catalog();
        assert_eq!(catalog.resolve_project_id("app").unwrap().id, "0-1");
    }

    #[test]
    fn resolves_by_exact_name_then_substring() {
        let catalog = test_catalog();
        assert_eq!(catalog.resolve_project_id("mobile app").unwrap().id, "0-1");
        assert_eq!(catalog.resolve_project_id("backend").unwrap().id, "0-2");
    }

    #[test]
    fn id_beats_key() {
        let catalog = test_catalog();
        assert_eq!(catalog.resolve_project_id("0-1").unwrap().name, "Mobile App");
    }

    #[test]
    fn key_beats_name() {
        let catalog = ProjectCatalog::from_entries(vec![
            entry("0-1", "CORE", "Ops"),
            entry("0-2", "OPS", "Core Platform"),
        ])
        .unwrap();
        assert_eq!(catalog.resolve_project_id("ops").unwrap().id, "0-2");
    }

    #[test]
    fn exact_name_beats_substring() {
        let catalog = ProjectCatalog::from_entries(vec![
            entry("0-1", "WEB", "Web Platform"),
            entry("0-2", "PLT", "Platform"),
        ])
        .unwrap();
        assert_eq!(catalog.resolve_project_id("platform").unwrap().id, "0-2");
    }

    #[test]
    fn unknown_hint_is_not_found() {
        let catalog = test_catalog();
        assert_eq!(
            catalog.resolve_project_id("Website"),
            Err(ResolutionError::NotFound("Website".to_string()))
        );
        assert_eq!(catalog.resolve_project_id("  "), Err(ResolutionError::NoHint));
    }

    #[test]
    fn structured_hint_prefers_id_field() {
        let catalog = test_catalog();
        let hint = ProjectHint::new("0-2", "APP", "Mobile App");
        assert_eq!(catalog.resolve_hint(&hint).unwrap().id, "0-2");
    }

    #[test]
    fn structured_hint_falls_through_unresolvable_fields() {
        let catalog = test_catalog();
        let hint = ProjectHint::new("99-9", "NOPE", "backend");
        assert_eq!(catalog.resolve_hint(&hint).unwrap().id, "0-2");
    }

    #[test]
    fn exact_key_on_later_field_beats_substring_on_earlier_field() {
        let catalog = ProjectCatalog::from_entries(vec![
            entry("0-1", "APP", "Mobile App"),
            entry("0-2", "BE", "Backend"),
        ])
        .unwrap();

        let hint = ProjectHint::new("mobile", "BE", "");
        assert_eq!(catalog.resolve_hint(&hint).unwrap().id, "0-2");
    }

    #[test]
    fn exact_name_beats_substring_key() {
        let catalog = ProjectCatalog::from_entries(vec![
            entry("0-1", "APP", "Mobile App"),
            entry("0-2", "BE", "Backend"),
        ])
        .unwrap();

        let hint = ProjectHint::new("", "Back", "Mobile App");
        assert_eq!(catalog.resolve_hint(&hint).unwrap().id, "0-1");
    }

    #[test]
    fn key_field_naming_an_id_still_resolves_by_id() {
        let catalog = test_catalog();
        let hint = ProjectHint::new("", "0-2", "Mobile App");
        assert_eq!(catalog.resolve_hint(&hint).unwrap().id, "0-2");
    }

    #[test]
    fn structured_hint_reports_missing_or_unknown() {
        let catalog = test_catalog();
        assert_eq!(
            catalog.resolve_hint(&ProjectHint::default()),
            Err(ResolutionError::NoHint)
        );
        assert_eq!(
            catalog.resolve_hint(&ProjectHint::from_key("XYZ")),
            Err(ResolutionError::NotFound("XYZ".to_string()))
        );
    }

    #[test]
    fn rejects_empty_and_duplicate_catalogs() {
        assert_eq!(ProjectCatalog::from_entries(vec![]), Err(CatalogError::Empty));
        assert_eq!(
            ProjectCatalog::from_entries(vec![entry("0-1", "A", "A"), entry("0-1", "B", "B")]),
            Err(CatalogError::DuplicateId("0-1".to_string()))
        );
        assert_eq!(
            ProjectCatalog::from_entries(vec![entry("0-1", "app", "A"), entry("0-2", "APP", "B")]),
            Err(CatalogError::DuplicateKey("APP".to_string()))
        );
    }

    #[test]
    fn parses_yaml_catalog() {
        let yaml = r#"
projects:
  - id: "0-4"
    key: APP
    name: Mobile App
    description: User-facing Android/iOS bugs and feature requests
  - id: "0-5"
    key: BE
    name: Backend
"#;
        let catalog = ProjectCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("0-5").unwrap().description, "");
    }

    #[test]
    fn yaml_with_blank_key_is_rejected() {
        let yaml = "projects:\n  - id: \"0-1\"\n    key: \"\"\n    name: X\n";
        assert!(matches!(
            ProjectCatalog::from_yaml_str(yaml),
            Err(CatalogError::InvalidEntry { index: 0, .. })
        ));
    }

    #[test]
    fn loads_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.yaml");
        std::fs::write(&path, "projects:\n  - id: \"0-1\"\n    key: APP\n    name: App\n").unwrap();

        let catalog = ProjectCatalog::from_yaml_file(&path).unwrap();
        assert_eq!(catalog.entries()[0].key, "APP");

        let missing = ProjectCatalog::from_yaml_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn prompt_json_lists_every_field() {
        let json = test_catalog().to_prompt_json();
        assert_eq!(json[0]["id"], "0-1");
        assert_eq!(json[0]["key"], "APP");
        assert_eq!(json[0]["name"], "Mobile App");
    }

    proptest! {
        #[test]
        fn property_resolution_is_deterministic(hint in "[A-Za-z0-9 -]{0,16}") {
            let catalog = test_catalog();
            prop_assert_eq!(
                catalog.resolve_project_id(&hint).map(|e| e.id.clone()),
                catalog.resolve_project_id(&hint).map(|e| e.id.clone())
            );
        }

        #[test]
        fn property_every_id_resolves_to_itself(index in 0usize..3) {
            let catalog = test_catalog();
            let id = catalog.entries()[index].id.clone();
            prop_assert_eq!(&catalog.resolve_project_id(&id).unwrap().id, &id);
        }
    }
}
