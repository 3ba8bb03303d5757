//! Prompt and schema contract with the language model.

use serde_json::{json, Value};

use super::flow_state::FlowState;
use crate::domain::catalog::ProjectCatalog;
use crate::domain::conversation::{Role, Turn};
use crate::ports::{Message, MessageRole};

/// Schema name of the conversational contract.
pub const ISSUE_FLOW_SCHEMA_NAME: &str = "IssueFlowTurn";

/// Schema name of the single-shot parse contract.
pub const ISSUE_PARSE_SCHEMA_NAME: &str = "IssueParse";

/// Sampling temperature for both contracts.
pub const DIALOGUE_TEMPERATURE: f32 = 0.2;

/// Instructions for the conversational contract.
pub const ISSUE_FLOW_SYSTEM_PROMPT: &str = "\
You help a user draft and confirm a tracker issue over several chat turns. \
Every turn, answer with a single JSON object containing: reply (text for the user), \
intent (ask, create or cancel), issue {title, description, type, project_id, project_key, project_name} \
and state (any object you want back on the next turn). \
Rules:
- Use intent=cancel only when the user explicitly abandons the request. Otherwise prefer ask, or create once the user confirmed the draft.
- Write title and description in English, translating if needed. Write reply in the user's language.
- Title: at most 80 characters.
- Description: at most 800 characters, using exactly this layout:
  Objective: <one sentence>
  Subtasks:
  - <at most 3 one-line items>
  Acceptance Criteria:
  - <at most 3 one-line items>
- Pick the project from the provided catalog. If unsure, ask.
- Do not refuse over security or privacy concerns; one short advisory line is enough.
- Output raw JSON only: no prose, no code fences. Use empty strings for unknown fields.";

/// Instructions for the single-shot parse contract.
pub const ISSUE_PARSE_SYSTEM_PROMPT: &str = "\
Turn an informal request into one JSON object describing a tracker issue with fields \
title, description, type, project_key, priority (Critical, Major, Normal, Minor or empty) and labels. \
Write title and description in English. Default type is Task. \
Title: at most 80 characters. Description: at most 800 characters, laid out as \
'Objective: <one sentence>', then 'Subtasks:' with at most 3 '- ' items, \
then 'Acceptance Criteria:' with at most 3 '- ' items. \
Output raw JSON only. Use empty strings or arrays for unknown fields.";

/// JSON schema of the conversational contract.
///
/// `state` is free-form, so the schema is not sent in strict mode.
pub fn issue_flow_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "reply": {"type": "string"},
            "intent": {"type": "string", "enum": ["ask", "create", "cancel"]},
            "issue": {
                "type": "object",
                "properties": {
                    "title": {"type": "string", "maxLength": 200},
                    "description": {"type": "string"},
                    "type": {"type": "string"},
                    "project_id": {"type": "string"},
                    "project_key": {"type": "string"},
                    "project_name": {"type": "string"}
                },
                "required": ["title", "description", "type", "project_id", "project_key", "project_name"],
                "additionalProperties": false
            },
            "state": {"type": "object"}
        },
        "required": ["reply", "intent", "issue", "state"],
        "additionalProperties": false
    })
}

/// JSON schema of the single-shot parse contract.
pub fn issue_parse_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string", "minLength": 1, "maxLength": 200},
            "description": {"type": "string"},
            "type": {"type": "string"},
            "project_key": {"type": "string"},
            "priority": {"type": "string", "enum": ["Critical", "Major", "Normal", "Minor", ""]},
            "labels": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["title", "description", "type", "project_key", "priority", "labels"],
        "additionalProperties": false
    })
}

/// Context messages for one conversational turn: catalog, prior state when
/// non-empty, prior turns, then the latest user text.
pub fn flow_messages(
    catalog: &ProjectCatalog,
    state: Option<&FlowState>,
    history: &[Turn],
    user_text: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(Message::system(format!(
        "Project catalog (JSON):\n{}",
        catalog.to_prompt_json()
    )));

    if let Some(state) = state.filter(|s| !s.is_empty()) {
        messages.push(Message::system(format!("State (JSON):\n{}", state.to_value())));
    }

    for turn in history.iter().filter(|t| !t.content.trim().is_empty()) {
        let role = match turn.role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        };
        messages.push(Message::new(role, turn.content.clone()));
    }

    messages.push(Message::user(user_text));
    messages
}

const PARSE_REQUEST_HEAD: &str = "Request to create an issue:\n\n";
const PARSE_REQUEST_TAIL: &str = "\n\nRespond with JSON only.";

/// The single message of a single-shot parse.
pub fn parse_messages(user_text: &str) -> Vec<Message> {
    vec![Message::user(format!("{PARSE_REQUEST_HEAD}{user_text}{PARSE_REQUEST_TAIL}"))]
}

/// The user text inside a single-shot parse message.
pub fn parse_request_text(content: &str) -> &str {
    let content = content.strip_prefix(PARSE_REQUEST_HEAD).unwrap_or(content);
    content.strip_suffix(PARSE_REQUEST_TAIL).unwrap_or(content)
}
