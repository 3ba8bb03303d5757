//! Conversation domain module.
//!
//! Chat history primitives shared by the store and the dialogue step.

mod turn;

pub use turn::{Role, Turn};
