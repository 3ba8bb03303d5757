//! Turn entity for conversation history.
//!
//! Turns are immutable records of user/assistant exchanges. Order within a
//! conversation is chronological and is replayed to the model as context.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The chat participant.
    User,
    /// The assistant's reply.
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub at: Timestamp,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>, at: Timestamp) -> Self {
        Self {
            role,
            content: content.into(),
            at,
        }
    }

    /// A user turn stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, Timestamp::now())
    }

    /// An assistant turn stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, Timestamp::now())
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role() {
        assert!(Turn::user("hi").is_user());
        assert_eq!(Turn::assistant("hello").role, Role::Assistant);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.to_string(), "user");
    }
}
