//! Chat Transport Port - Interface for the chat platform.
//!
//! The engine only needs inbound message identity and text, and a way to
//! post a reply into the thread a message came from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ConversationKey;

/// Errors raised by chat transports
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat authentication failed")]
    AuthenticationFailed,

    #[error("Event queue expired")]
    QueueExpired,

    #[error("Chat API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Chat network error: {0}")]
    Network(String),

    #[error("Failed to parse chat response: {0}")]
    Parse(String),
}

impl ChatError {
    /// Returns true if polling may simply be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChatError::QueueExpired | ChatError::Network(_) | ChatError::Api { status: 500..=599, .. }
        )
    }
}

/// Kind of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Posted in a stream topic.
    Stream,
    /// Direct message.
    Private,
}

/// A message delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: u64,
    pub kind: MessageKind,
    pub stream_id: Option<u64>,
    /// Stream display name.
    pub stream_name: String,
    pub topic: String,
    pub sender_id: u64,
    pub sender_email: String,
    pub sender_name: String,
    pub content: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl InboundMessage {
    /// Conversation identity for stream messages.
    pub fn conversation_key(&self) -> Option<ConversationKey> {
        match (self.kind, self.stream_id) {
            (MessageKind::Stream, Some(stream_id)) => {
                Some(ConversationKey::new(stream_id, &self.topic, self.sender_id))
            }
            _ => None,
        }
    }

    /// Where replies to this message go.
    pub fn reply_target(&self) -> ReplyTarget {
        ReplyTarget {
            stream_id: self.stream_id,
            stream_name: self.stream_name.clone(),
            topic: self.topic.clone(),
        }
    }
}

/// Stream and topic a reply is posted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub stream_id: Option<u64>,
    pub stream_name: String,
    pub topic: String,
}

impl ReplyTarget {
    /// Stream reference for the send API: the id when known, else the name.
    pub fn stream_ref(&self) -> String {
        match self.stream_id {
            Some(id) => id.to_string(),
            None => self.stream_name.clone(),
        }
    }
}

/// Port for the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Next batch of inbound messages. May block (long poll).
    async fn poll_messages(&self) -> Result<Vec<InboundMessage>, ChatError>;

    /// Post `text` to the thread identified by `target`.
    async fn send_reply(&self, target: &ReplyTarget, text: &str) -> Result<(), ChatError>;
}
