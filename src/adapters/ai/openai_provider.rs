//! OpenAI-compatible Provider - Implementation of AIProvider for chat-completions APIs.
//!
//! Targets any endpoint speaking the OpenAI chat-completions dialect
//! (OpenAI, OpenRouter, local gateways) and forwards the request's output-shape
//! contract as `response_format: {type: "json_schema"}`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("openai/gpt-4o-mini")
//!     .with_base_url("https://openrouter.ai/api/v1")
//!     .with_app_attribution(Some("https://example.com".into()), Some("issue-scribe".into()));
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ResponseFormat, TokenUsage,
};

/// Default endpoint (OpenRouter).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "openai/gpt-4o-mini").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt.
    pub retry_base_delay: Duration,
    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    pub http_referer: Option<String>,
    /// Sent as `X-Title` for OpenRouter attribution.
    pub app_title: Option<String>,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "openai/gpt-4o-mini".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            retry_base_delay: Duration::from_secs(1),
            http_referer: None,
            app_title: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial backoff delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Sets OpenRouter attribution headers.
    pub fn with_app_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.http_referer = referer.filter(|s| !s.trim().is_empty());
        self.app_title = title.filter(|s| !s.trim().is_empty());
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Delay before retry `attempt` (0-based): base, 2x base, 4x base, capped.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.config
            .retry_base_delay
            .saturating_mul(factor)
            .min(MAX_BACKOFF)
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to the wire format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(prompt.clone()),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            });
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.response_format.as_ref().map(OpenAIResponseFormat::from),
        }
    }

    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let mut builder = builder
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json");
        if let Some(ref referer) = self.config.http_referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.app_title {
            builder = builder.header("X-Title", title);
        }
        builder
    }

    /// Sends a request and maps transport failures.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.with_headers(self.client.post(self.completions_url()))
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::timeout(self.config.timeout)
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(Self::parse_retry_after(&error_body))),
            400 | 404 | 422 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from an error body, defaulting to 30 seconds.
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(String::from));

        if let Some(message) = message {
            if let Some(idx) = message.find("try again in ") {
                let digits: String = message[idx + 13..]
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect();
                if let Ok(secs) = digits.parse::<u32>() {
                    return secs;
                }
            }
        }
        30
    }

    /// Parses a completion response.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        let usage = openai_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: openai_response.model.unwrap_or_else(|| self.config.model.clone()),
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut retry_count = 0;

        loop {
            let result = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(completion) => {
                    tracing::debug!(
                        trace_id = %request.metadata.trace_id,
                        model = %completion.model,
                        prompt_tokens = completion.usage.prompt_tokens,
                        completion_tokens = completion.usage.completion_tokens,
                        finish_reason = ?completion.finish_reason,
                        "Completion received"
                    );
                    return Ok(completion);
                }
                Err(err) if !err.is_retryable() || retry_count >= self.config.max_retries => {
                    return Err(err)
                }
                Err(err) => {
                    tracing::warn!(
                        trace_id = %request.metadata.trace_id,
                        attempt = retry_count + 1,
                        error = %err,
                        "Completion failed, retrying"
                    );
                }
            }

            sleep(self.backoff(retry_count)).await;
            retry_count += 1;
        }
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: OpenAIJsonSchema,
}

#[derive(Debug, Serialize)]
struct OpenAIJsonSchema {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

impl From<&ResponseFormat> for OpenAIResponseFormat {
    fn from(format: &ResponseFormat) -> Self {
        Self {
            kind: "json_schema",
            json_schema: OpenAIJsonSchema {
                name: format.name.clone(),
                strict: format.strict,
                schema: format.schema.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
