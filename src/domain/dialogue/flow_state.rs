//! Opaque per-conversation flow state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::issue::IssueDraft;

/// State blob authored by the model and replayed verbatim on the next turn.
///
/// The engine never reads its fields; it only stores, replaces or clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowState(Map<String, Value>);

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; anything other than an object yields empty state.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// State seeded with a draft, used when the single-shot parser stands in
    /// for the conversational one.
    pub fn with_draft(draft: &IssueDraft) -> Self {
        let mut map = Map::new();
        map.insert("draft".to_string(), draft.to_json());
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for FlowState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
