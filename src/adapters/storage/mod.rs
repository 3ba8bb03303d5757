//! Storage Adapters
//!
//! Implementations of the ConversationStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryConversationStore** - History and flow state in process memory

mod in_memory_conversation_store;

pub use in_memory_conversation_store::{
    InMemoryConversationStore, DEFAULT_HISTORY_LIMIT, DEFAULT_IDLE_TTL_SECS,
};
