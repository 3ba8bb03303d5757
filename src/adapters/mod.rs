//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI-compatible chat completions, plus a scripted mock
//! - `chat` - Zulip event queue and messages, plus a recording double
//! - `storage` - In-memory conversation store
//! - `tracker` - YouTrack issue creation, plus a mock

pub mod ai;
pub mod chat;
pub mod storage;
pub mod tracker;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use chat::{RecordingTransport, ZulipClient, ZulipConfig};
pub use storage::InMemoryConversationStore;
pub use tracker::{MockIssueTracker, YouTrackClient, YouTrackConfig};
