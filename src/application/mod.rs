//! Application layer - Handlers, routing and the chat runtime.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod router;
pub mod runtime;
pub mod turn_queue;

pub use handlers::{
    DialogueInput, DialogueSettings, FileIssueHandler, GeneralChatHandler, IssueFlowDialogue,
    MessageHandler, SupportTriageHandler, TurnError, TurnOutcome, TRACKER_NOT_CONFIGURED,
};
pub use router::{Route, Router};
pub use runtime::{ChatRuntime, RuntimeError, RuntimeReport};
pub use turn_queue::{TurnQueue, TurnSlot};
