//! Handlers that answer without a model or tracker.
//!
//! - `support_triage` - Canned triage acknowledgement
//! - `general_chat` - Echoes the message back

mod general_chat;
mod support_triage;

pub use general_chat::GeneralChatHandler;
pub use support_triage::{SupportTriageHandler, TRIAGE_NOTED, TRIAGE_URGENT};
