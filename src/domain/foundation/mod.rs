//! Foundation module - Shared domain primitives.
//!
//! Value objects and error types used across the issue-flow domain.

mod conversation_key;
mod errors;
mod timestamp;

pub use conversation_key::ConversationKey;
pub use errors::ValidationError;
pub use timestamp::Timestamp;
