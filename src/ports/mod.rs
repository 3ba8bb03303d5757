//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Language-model completions under a schema contract
//! - `ChatTransport` - Inbound chat messages and replies
//! - `IssueTracker` - Issue creation
//! - `ConversationStore` - Per-conversation history and flow state

mod ai_provider;
mod chat_transport;
mod conversation_store;
mod issue_tracker;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use chat_transport::{ChatError, ChatTransport, InboundMessage, MessageKind, ReplyTarget};
pub use conversation_store::{ConversationStore, StateUpdate, StoreError, TurnCommit};
pub use issue_tracker::{CreatedIssue, IssueTracker, NewIssue, TrackerError};
