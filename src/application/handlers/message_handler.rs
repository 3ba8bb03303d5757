//! Common handler contract for routed chat messages.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::issue::FiledIssue;
use crate::ports::{ChatError, InboundMessage, StoreError};

/// Errors that abort a turn.
///
/// Model and tracker failures are answered in chat and are not errors here.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Chat transport error: {0}")]
    Chat(#[from] ChatError),

    #[error("Conversation store error: {0}")]
    Store(#[from] StoreError),
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank text or not a stream message.
    Ignored,
    /// Answered with a fixed or echoed reply.
    Replied,
    /// The issue tracker is not configured; the user was told so.
    NotConfigured,
    /// Asked back with a draft preview attached.
    Previewed,
    /// Asked back without a draft.
    Clarified,
    /// Issue created in the tracker.
    Filed(FiledIssue),
    /// Conversation abandoned by the user.
    Cancelled,
    /// Model or tracker call failed; nothing was committed.
    Failed,
}

/// A handler the router can dispatch a message to.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handles one inbound message.
    async fn handle(&self, message: &InboundMessage) -> Result<TurnOutcome, TurnError>;

    /// Handler name for logs.
    fn name(&self) -> &'static str;
}
