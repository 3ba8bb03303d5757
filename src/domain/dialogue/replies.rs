//! Engine-authored reply texts.

use super::decision::DowngradeReason;
use crate::domain::catalog::ResolutionError;

/// Maximum reply length in characters.
pub const MAX_REPLY_CHARS: usize = 4_000;

/// Maximum length of tracker error detail shown to the user.
pub const MAX_ERROR_DETAIL_CHARS: usize = 200;

pub const GENERIC_CLARIFICATION: &str =
    "Sorry, I didn't quite get that. Could you describe the issue you want to file?";

pub const GENERIC_FAILURE: &str =
    "Sorry, I couldn't process that message right now. Please try again in a moment.";

pub const DRAFT_CONFIRMATION: &str =
    "Here is a first draft. Which project should it go to, and shall I create it?";

/// Trims a reply, substitutes a generic text when empty and caps its length.
pub fn normalize_reply(reply: &str) -> String {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return GENERIC_CLARIFICATION.to_string();
    }
    truncate_chars(trimmed, MAX_REPLY_CHARS)
}

/// Clarification shown when a `create` cannot be honored.
pub fn downgrade_reply(reason: &DowngradeReason) -> String {
    match reason {
        DowngradeReason::MissingDraft => {
            "I don't have a complete draft yet. What should the issue say?".to_string()
        }
        DowngradeReason::InvalidDraft(err) => format!(
            "The draft needs another pass before I can file it ({err}). Could you confirm or adjust it?"
        ),
        DowngradeReason::UnresolvedProject(ResolutionError::NoHint) => {
            "Which project should this issue go to? (project key or name)".to_string()
        }
        DowngradeReason::UnresolvedProject(ResolutionError::NotFound(hint)) => format!(
            "I couldn't find a project matching '{hint}'. Which project should this issue go to? (project key or name)"
        ),
    }
}

/// Reply for a tracker failure, with the detail capped.
pub fn tracker_failure_reply(detail: &str) -> String {
    format!(
        "Could not create the issue: {}",
        truncate_chars(detail.trim(), MAX_ERROR_DETAIL_CHARS)
    )
}

/// Truncates on a character boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
