//! Draft preview rendering.

use super::draft::IssueDraft;
use crate::domain::catalog::ProjectCatalogEntry;

const UNSET: &str = "(unset)";

/// Renders a draft as a confirmation block appended to a reply.
///
/// The project line shows the resolved entry when available, then the raw
/// hint, then `(unset)`.
pub fn render_preview(draft: &IssueDraft, resolved: Option<&ProjectCatalogEntry>) -> String {
    let title = if draft.title.is_empty() { UNSET } else { draft.title.as_str() };
    let project = match resolved {
        Some(entry) => entry.label(),
        None => draft.project.raw().unwrap_or(UNSET).to_string(),
    };
    let description = if draft.description.is_empty() {
        "(empty)"
    } else {
        draft.description.as_str()
    };

    format!(
        "Draft preview:\n- Title: {title}\n- Type: {}\n- Project: {project}\n- Description:\n```\n{description}\n```",
        draft.type_or_default()
    )
}

/// Joins a reply and a preview block with a blank line.
pub fn append_preview(reply: &str, preview: &str) -> String {
    format!("{reply}\n\n{preview}").trim().to_string()
}
