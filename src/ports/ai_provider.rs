//! Language-model port.
//!
//! The dialogue step talks to the model only through [`AIProvider`]. A request
//! is a list of chat messages plus sampling limits and an optional named JSON
//! schema the answer has to follow.

use async_trait::async_trait;

use crate::domain::foundation::ConversationKey;

/// Chat-completion backend.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Runs one completion. Implementations own their retry policy.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;
}

/// One completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Context, history and the latest user text, in order.
    pub messages: Vec<Message>,
    /// Sent ahead of `messages`.
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Output shape the model is asked to follow.
    pub response_format: Option<ResponseFormat>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            response_format: None,
            metadata,
        }
    }

    /// Appends messages in order.
    pub fn with_messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Content of the last user message, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A named JSON schema for the answer (`response_format: json_schema`).
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    /// `IssueFlowTurn` or `IssueParse`.
    pub name: String,
    pub schema: serde_json::Value,
    /// Ask the backend to enforce the schema.
    pub strict: bool,
}

impl ResponseFormat {
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value, strict: bool) -> Self {
        Self {
            name: name.into(),
            schema,
            strict,
        }
    }
}

/// Correlates a model call with its conversation in the logs.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub conversation: ConversationKey,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(conversation: ConversationKey, trace_id: impl Into<String>) -> Self {
        Self {
            conversation,
            trace_id: trace_id.into(),
        }
    }

    /// Metadata with a fresh random trace id.
    pub fn traced(conversation: ConversationKey) -> Self {
        Self::new(conversation, uuid::Uuid::new_v4().to_string())
    }
}

/// Result of a completion call.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Model that actually answered (routers may substitute one).
    pub model: String,
    pub finish_reason: FinishReason,
}

/// Token counts reported by the backend. Zero when not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishReason {
    /// The model finished its answer.
    Stop,
    /// Cut off at `max_tokens`; the content is incomplete.
    Length,
    /// Withheld or cut by the backend's content filter.
    ContentFilter,
}

impl FinishReason {
    /// True when the content cannot be trusted to be a whole answer.
    pub fn is_cut_off(&self) -> bool {
        !matches!(self, FinishReason::Stop)
    }
}

/// Model call failures.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Timeout error for a duration, saturating at `u32::MAX` seconds.
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout {
            timeout_secs: u32::try_from(duration.as_secs()).unwrap_or(u32::MAX),
        }
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(ConversationKey::new(7, "create issue", 42), "trace-123")
    }

    #[test]
    fn builder_keeps_message_order_and_limits() {
        let request = CompletionRequest::new(metadata())
            .with_system_prompt("Be brief")
            .with_messages(vec![Message::system("catalog"), Message::user("Fix login")])
            .with_messages(vec![Message::assistant("Which project?"), Message::user("APP")])
            .with_max_tokens(100)
            .with_temperature(0.2)
            .with_response_format(ResponseFormat::json_schema("IssueParse", json!({}), true));

        let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["catalog", "Fix login", "Which project?", "APP"]);
        assert_eq!(request.system_prompt.as_deref(), Some("Be brief"));
        assert_eq!(request.max_tokens, Some(100));
        assert_eq!(request.response_format.unwrap().name, "IssueParse");
    }

    #[test]
    fn last_user_text_skips_other_roles() {
        let request = CompletionRequest::new(metadata())
            .with_messages(vec![Message::user("first"), Message::assistant("reply")]);
        assert_eq!(request.last_user_text(), Some("first"));
        assert_eq!(CompletionRequest::new(metadata()).last_user_text(), None);
    }

    #[test]
    fn traced_metadata_has_unique_ids() {
        let key = ConversationKey::new(1, "t", 2);
        let a = RequestMetadata::traced(key.clone());
        let b = RequestMetadata::traced(key);
        assert_ne!(a.trace_id, b.trace_id);
    }

    #[test]
    fn usage_total_saturates() {
        assert_eq!(TokenUsage::new(100, 50).total(), 150);
        assert_eq!(TokenUsage::new(u32::MAX, 1).total(), u32::MAX);
    }

    #[test]
    fn only_stop_is_a_whole_answer() {
        assert!(!FinishReason::Stop.is_cut_off());
        assert!(FinishReason::Length.is_cut_off());
        assert!(FinishReason::ContentFilter.is_cut_off());
    }

    #[test]
    fn retryable_classification() {
        assert!(AIError::rate_limited(30).is_retryable());
        assert!(AIError::unavailable("down").is_retryable());
        assert!(AIError::network("reset").is_retryable());
        assert!(AIError::timeout(Duration::from_secs(30)).is_retryable());

        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::parse("garbage").is_retryable());
    }

    #[test]
    fn timeout_saturates_huge_durations() {
        assert!(matches!(
            AIError::timeout(Duration::from_secs(u64::MAX)),
            AIError::Timeout { timeout_secs: u32::MAX }
        ));
        assert_eq!(
            AIError::timeout(Duration::from_secs(60)).to_string(),
            "request timed out after 60s"
        );
    }
}
