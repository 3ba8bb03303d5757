//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI-compatible chat-completions endpoints (OpenRouter by default)
//! - `HeuristicProvider` - Offline drafting when no API key is configured
//! - `MockAIProvider` - Scripted mock for testing

mod heuristic_provider;
mod mock_provider;
mod openai_provider;

pub use heuristic_provider::{HeuristicProvider, HEURISTIC_REPLY};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, DEFAULT_BASE_URL};
