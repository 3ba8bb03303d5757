//! Conversation Store Port - Interface for per-conversation history and flow state.
//!
//! History and flow state are keyed identically and always updated together
//! at the end of a turn through [`ConversationStore::commit`].

use async_trait::async_trait;

use crate::domain::conversation::Turn;
use crate::domain::dialogue::FlowState;
use crate::domain::foundation::ConversationKey;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize flow state: {0}")]
    SerializationFailed(String),
}

/// What happens to the flow state when a turn commits.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// Leave the stored state untouched.
    Keep,
    /// Replace the stored state.
    Replace(FlowState),
    /// Drop history and state for the key.
    Clear,
}

/// Side effects of one completed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnCommit {
    /// Turns to append, in order. Ignored when the update is `Clear`.
    pub turns: Vec<Turn>,
    pub state: StateUpdate,
}

impl TurnCommit {
    pub fn new(turns: Vec<Turn>, state: StateUpdate) -> Self {
        Self { turns, state }
    }

    /// A commit that forgets the conversation.
    pub fn clear() -> Self {
        Self::new(Vec::new(), StateUpdate::Clear)
    }
}

/// Port for conversation history and flow state
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append one turn to the history of `key`
    async fn append_turn(&self, key: &ConversationKey, turn: Turn) -> Result<(), StoreError>;

    /// Most recent turns for `key`, oldest first
    async fn get_history(&self, key: &ConversationKey) -> Result<Vec<Turn>, StoreError>;

    /// Flow state for `key`, if any
    async fn get_state(&self, key: &ConversationKey) -> Result<Option<FlowState>, StoreError>;

    /// Replace the flow state for `key`
    async fn set_state(&self, key: &ConversationKey, state: FlowState) -> Result<(), StoreError>;

    /// Forget history and state for `key`
    async fn clear(&self, key: &ConversationKey) -> Result<(), StoreError>;

    /// Apply turn appends and a state update atomically
    ///
    /// A concurrent reader of the same key observes either none or all of
    /// the commit.
    async fn commit(&self, key: &ConversationKey, commit: TurnCommit) -> Result<(), StoreError>;
}
