//! Conversation identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one independent dialogue thread: a participant talking in a
/// specific stream topic.
///
/// Topics are matched case-insensitively by the chat platform, so the topic is
/// lowercased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    stream_id: u64,
    topic: String,
    sender_id: u64,
}

impl ConversationKey {
    /// Creates a key from the identity fields of an inbound message.
    pub fn new(stream_id: u64, topic: impl AsRef<str>, sender_id: u64) -> Self {
        Self {
            stream_id,
            topic: topic.as_ref().trim().to_lowercase(),
            sender_id,
        }
    }

    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn sender_id(&self) -> u64 {
        self.sender_id
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.stream_id, self.topic, self.sender_id)
    }
}
