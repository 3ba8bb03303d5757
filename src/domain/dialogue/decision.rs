//! Per-turn dialogue decision.

use serde::{Deserialize, Serialize};

use super::flow_state::FlowState;
use crate::domain::catalog::{ProjectCatalogEntry, ResolutionError};
use crate::domain::issue::{DraftValidationError, IssueDraft};

/// What the model wants to do with the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Keep talking: clarify, or show a draft for confirmation.
    Ask,
    /// File the draft now.
    Create,
    /// Abandon the conversation.
    Cancel,
}

impl Intent {
    /// Parses a model-supplied label. Unknown labels fall back to `Ask`.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "create" => Intent::Create,
            "cancel" => Intent::Cancel,
            _ => Intent::Ask,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Ask => "ask",
            Intent::Create => "create",
            Intent::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of one dialogue step.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueDecision {
    /// Text shown to the user, in their language.
    pub reply: String,
    pub intent: Intent,
    /// Draft carried by the turn, if the model produced one.
    pub issue: Option<IssueDraft>,
    /// Next flow state.
    pub state: FlowState,
    /// Catalog entry the draft's project hint resolved to.
    pub project: Option<ProjectCatalogEntry>,
}

/// Why a `create` was turned into an `ask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DowngradeReason {
    MissingDraft,
    InvalidDraft(DraftValidationError),
    UnresolvedProject(ResolutionError),
}

/// Why the model response could not be used at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// No JSON object could be recovered.
    Extraction(String),
    /// The object lacks a string `reply` or `intent`.
    MissingField(&'static str),
    /// Generation stopped before the answer was complete.
    CutOff,
}

/// How the decision relates to what the model actually said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Used as returned.
    Accepted,
    /// A `create` that could not be honored.
    Downgraded(DowngradeReason),
    /// Replaced by a generic clarification; prior state must be kept.
    Degraded(DegradeReason),
}

/// A decision plus its disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueOutcome {
    pub decision: DialogueDecision,
    pub disposition: Disposition,
}

impl DialogueOutcome {
    pub fn accepted(decision: DialogueDecision) -> Self {
        Self {
            decision,
            disposition: Disposition::Accepted,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.disposition, Disposition::Degraded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_intents_become_ask() {
        assert_eq!(Intent::parse_lenient(" CREATE "), Intent::Create);
        assert_eq!(Intent::parse_lenient("cancel"), Intent::Cancel);
        assert_eq!(Intent::parse_lenient("confirm"), Intent::Ask);
        assert_eq!(Intent::parse_lenient(""), Intent::Ask);
    }
}
