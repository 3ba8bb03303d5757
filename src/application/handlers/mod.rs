//! Application handlers.
//!
//! Handlers that orchestrate domain operations across ports.

pub mod issue_flow;
mod message_handler;
pub mod replies;

pub use issue_flow::{
    DialogueInput, DialogueSettings, FileIssueHandler, IssueFlowDialogue, TRACKER_NOT_CONFIGURED,
};
pub use message_handler::{MessageHandler, TurnError, TurnOutcome};
pub use replies::{GeneralChatHandler, SupportTriageHandler};
