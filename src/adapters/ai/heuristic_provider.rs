//! Offline provider used when no language-model key is configured.
//!
//! Drafts straight from the message: the first line becomes the title and the
//! remaining lines the description. It always asks for the project and never
//! creates or cancels on its own.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::dialogue::{parse_request_text, truncate_chars, ISSUE_PARSE_SCHEMA_NAME};
use crate::domain::issue::{MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, TokenUsage,
};

/// Reply attached to every heuristic draft.
pub const HEURISTIC_REPLY: &str = "No language model is configured, so the draft below is \
taken from your message as written. Which project should it go in? Reply with a project \
key or name.";

const HEURISTIC_MODEL: &str = "heuristic";
const UNTITLED: &str = "Untitled";

/// Rule-based stand-in for a chat-completions backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Splits a message into a title line and a description.
fn split_message(text: &str) -> (String, String) {
    let mut lines = text.trim().lines();
    let first = lines.next().map(str::trim).unwrap_or_default();
    let title = if first.is_empty() {
        UNTITLED.to_string()
    } else {
        truncate_chars(first, MAX_TITLE_CHARS).trim_end().to_string()
    };
    let rest = lines.collect::<Vec<_>>().join("\n");
    (title, truncate_chars(rest.trim(), MAX_DESCRIPTION_CHARS))
}

#[async_trait]
impl AIProvider for HeuristicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let text = request.last_user_text().unwrap_or_default();
        let single_shot = request
            .response_format
            .as_ref()
            .is_some_and(|format| format.name == ISSUE_PARSE_SCHEMA_NAME);

        let answer = if single_shot {
            let (title, description) = split_message(parse_request_text(text));
            json!({"title": title, "description": description})
        } else {
            let (title, description) = split_message(text);
            let draft = json!({"title": title, "description": description});
            json!({
                "reply": HEURISTIC_REPLY,
                "intent": "ask",
                "issue": draft,
                "state": {"draft": draft},
            })
        };

        tracing::debug!(
            trace_id = %request.metadata.trace_id,
            single_shot,
            "Heuristic draft produced"
        );
        Ok(CompletionResponse {
            content: answer.to_string(),
            usage: TokenUsage::default(),
            model: HEURISTIC_MODEL.to_string(),
            finish_reason: FinishReason::Stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::{parse_messages, ISSUE_FLOW_SCHEMA_NAME};
    use crate::domain::foundation::ConversationKey;
    use crate::ports::{Message, RequestMetadata, ResponseFormat};
    use serde_json::Value;

    fn request(format: &str, messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::traced(ConversationKey::new(1, "t", 2)))
            .with_messages(messages)
            .with_response_format(ResponseFormat::json_schema(format, json!({}), false))
    }

    async fn answer(request: CompletionRequest) -> Value {
        let response = HeuristicProvider::new().complete(request).await.unwrap();
        assert_eq!(response.finish_reason, FinishReason::Stop);
        serde_json::from_str(&response.content).unwrap()
    }

    #[tokio::test]
    async fn first_line_is_title_and_rest_is_description() {
        let messages = vec![
            Message::system("catalog"),
            Message::user("Login times out\nOn Android 14\nSince Monday"),
        ];

        let value = answer(request(ISSUE_FLOW_SCHEMA_NAME, messages)).await;

        assert_eq!(value["intent"], "ask");
        assert_eq!(value["reply"], HEURISTIC_REPLY);
        assert_eq!(value["issue"]["title"], "Login times out");
        assert_eq!(value["issue"]["description"], "On Android 14\nSince Monday");
        assert_eq!(value["state"]["draft"], value["issue"]);
    }

    #[tokio::test]
    async fn long_title_is_cut_to_the_limit() {
        let long = "x".repeat(MAX_TITLE_CHARS + 40);

        let value = answer(request(ISSUE_FLOW_SCHEMA_NAME, vec![Message::user(long)])).await;

        let title = value["issue"]["title"].as_str().unwrap();
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(value["issue"]["description"], "");
    }

    #[test]
    fn blank_first_line_is_untitled() {
        assert_eq!(split_message("   ").0, UNTITLED);
    }

    #[tokio::test]
    async fn single_shot_parse_unwraps_the_request() {
        let messages = parse_messages("Crash on save\nStack trace attached");

        let value = answer(request(ISSUE_PARSE_SCHEMA_NAME, messages)).await;

        assert_eq!(value["title"], "Crash on save");
        assert_eq!(value["description"], "Stack trace attached");
        assert!(value.get("intent").is_none());
    }
}
