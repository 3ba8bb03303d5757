//! Zulip Chat Transport - Implementation of ChatTransport over Zulip's REST API.
//!
//! Registers an event queue for `message` events, long-polls it, and posts
//! replies as stream messages. Authenticates with the bot's email and API key
//! (HTTP basic auth).
//!
//! # Queue lifecycle
//!
//! The queue is registered lazily on the first poll. When the server reports
//! `BAD_EVENT_QUEUE_ID` (queue garbage-collected after inactivity), the stored
//! queue is dropped and the next poll registers a fresh one.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::ports::{ChatError, ChatTransport, InboundMessage, MessageKind, ReplyTarget};

/// Server-side long-poll window plus slack.
const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(90);

/// Configuration for the Zulip transport.
#[derive(Debug, Clone)]
pub struct ZulipConfig {
    /// Server URL, e.g. `https://chat.example.com`.
    pub base_url: String,
    /// Bot account email.
    pub email: String,
    /// Bot API key.
    api_key: Secret<String>,
    /// Timeout for the long-poll request.
    pub long_poll_timeout: Duration,
    /// Timeout for register and send requests.
    pub request_timeout: Duration,
}

impl ZulipConfig {
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email: email.into(),
            api_key: Secret::new(api_key.into()),
            long_poll_timeout: DEFAULT_LONG_POLL_TIMEOUT,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_long_poll_timeout(mut self, timeout: Duration) -> Self {
        self.long_poll_timeout = timeout;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueState {
    queue_id: String,
    last_event_id: i64,
}

/// Zulip API client.
pub struct ZulipClient {
    config: ZulipConfig,
    client: Client,
    queue: Mutex<Option<QueueState>>,
}

impl ZulipClient {
    pub fn new(config: ZulipConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ChatError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            queue: Mutex::new(None),
        })
    }

    /// Bot account email; messages from it are the bot's own.
    pub fn bot_email(&self) -> &str {
        &self.config.email
    }

    async fn register_queue(&self) -> Result<QueueState, ChatError> {
        tracing::debug!(url = %self.config.base_url, "Registering event queue");

        let response = self
            .client
            .post(self.config.api_url("register"))
            .basic_auth(&self.config.email, Some(self.config.api_key.expose_secret()))
            .timeout(self.config.request_timeout)
            .form(&[
                ("event_types", r#"["message"]"#),
                ("all_public_streams", "true"),
                ("apply_markdown", "false"),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let body: RegisterResponse = parse_body(response).await?;
        tracing::info!(
            queue_id = %body.queue_id,
            last_event_id = body.last_event_id,
            "Registered event queue"
        );
        Ok(QueueState {
            queue_id: body.queue_id,
            last_event_id: body.last_event_id,
        })
    }
}

#[async_trait]
impl ChatTransport for ZulipClient {
    async fn poll_messages(&self) -> Result<Vec<InboundMessage>, ChatError> {
        let mut queue = self.queue.lock().await;
        if queue.is_none() {
            *queue = Some(self.register_queue().await?);
        }
        let Some(state) = queue.as_mut() else {
            return Err(ChatError::QueueExpired);
        };

        let last_event_id = state.last_event_id.to_string();
        let response = self
            .client
            .get(self.config.api_url("events"))
            .basic_auth(&self.config.email, Some(self.config.api_key.expose_secret()))
            .timeout(self.config.long_poll_timeout)
            .query(&[
                ("queue_id", state.queue_id.as_str()),
                ("last_event_id", last_event_id.as_str()),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let body: EventsResponse = match parse_body(response).await {
            Ok(body) => body,
            Err(ChatError::QueueExpired) => {
                tracing::warn!(queue_id = %state.queue_id, "Event queue expired, re-registering");
                *queue = None;
                return Err(ChatError::QueueExpired);
            }
            Err(err) => return Err(err),
        };

        let mut messages = Vec::new();
        for event in body.events {
            state.last_event_id = state.last_event_id.max(event.id);
            if event.kind != "message" {
                continue;
            }
            if let Some(message) = event.message {
                messages.push(message.into_inbound());
            }
        }

        if !messages.is_empty() {
            tracing::debug!(
                count = messages.len(),
                last_event_id = state.last_event_id,
                "Received messages"
            );
        }
        Ok(messages)
    }

    async fn send_reply(&self, target: &ReplyTarget, text: &str) -> Result<(), ChatError> {
        let stream = target.stream_ref();
        let response = self
            .client
            .post(self.config.api_url("messages"))
            .basic_auth(&self.config.email, Some(self.config.api_key.expose_secret()))
            .timeout(self.config.request_timeout)
            .form(&[
                ("type", "stream"),
                ("to", stream.as_str()),
                ("topic", target.topic.as_str()),
                ("content", text),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let _: SendResponse = parse_body(response).await?;
        tracing::debug!(stream = %stream, topic = %target.topic, len = text.len(), "Reply sent");
        Ok(())
    }
}

fn network_error(e: reqwest::Error) -> ChatError {
    ChatError::Network(e.to_string())
}

/// Decodes a Zulip response, mapping `result: "error"` payloads.
async fn parse_body<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, ChatError> {
    let status = response.status().as_u16();
    let text = response.text().await.map_err(network_error)?;

    if status == 401 {
        return Err(ChatError::AuthenticationFailed);
    }
    if !(200..300).contains(&status) {
        let error: ZulipError = serde_json::from_str(&text).unwrap_or_else(|_| ZulipError {
            msg: text.clone(),
            code: None,
        });
        if error.code.as_deref() == Some("BAD_EVENT_QUEUE_ID") {
            return Err(ChatError::QueueExpired);
        }
        return Err(ChatError::Api {
            status,
            message: error.msg,
        });
    }

    serde_json::from_str(&text).map_err(|e| ChatError::Parse(e.to_string()))
}

// ----- Zulip API Types -----

#[derive(Debug, Deserialize)]
struct ZulipError {
    #[serde(default)]
    msg: String,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    queue_id: String,
    last_event_id: i64,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[allow(dead_code)]
    id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<ZulipEvent>,
}

#[derive(Debug, Deserialize)]
struct ZulipEvent {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
    message: Option<ZulipMessage>,
}

#[derive(Debug, Deserialize)]
struct ZulipMessage {
    id: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    display_recipient: serde_json::Value,
    stream_id: Option<u64>,
    #[serde(default)]
    subject: String,
    sender_id: u64,
    #[serde(default)]
    sender_email: String,
    #[serde(default)]
    sender_full_name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    timestamp: i64,
}

impl ZulipMessage {
    fn into_inbound(self) -> InboundMessage {
        let kind = if self.kind == "stream" {
            MessageKind::Stream
        } else {
            MessageKind::Private
        };
        InboundMessage {
            id: self.id,
            kind,
            stream_id: self.stream_id,
            stream_name: self.display_recipient.as_str().unwrap_or_default().to_string(),
            topic: self.subject,
            sender_id: self.sender_id,
            sender_email: self.sender_email,
            sender_name: self.sender_full_name,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> ZulipClient {
        ZulipClient::new(ZulipConfig::new(server.base_url(), "bot@example.com", "secret")).unwrap()
    }

    fn message_event(id: i64, content: &str) -> serde_json::Value {
        json!({
            "id": id,
            "type": "message",
            "message": {
                "id": 100 + id,
                "type": "stream",
                "display_recipient": "youtrack",
                "stream_id": 7,
                "subject": "create issue",
                "sender_id": 42,
                "sender_email": "dev@example.com",
                "sender_full_name": "Dev",
                "content": content,
                "timestamp": 1_700_000_000
            }
        })
    }

    #[tokio::test]
    async fn registers_then_polls_and_advances_event_id() {
        let server = MockServer::start();
        let register = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/register")
                .header_exists("authorization")
                .body_includes("all_public_streams=true");
            then.status(200)
                .json_body(json!({"result": "success", "queue_id": "q1", "last_event_id": -1}));
        });
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/events")
                .query_param("queue_id", "q1")
                .query_param("last_event_id", "-1");
            then.status(200).json_body(json!({
                "result": "success",
                "events": [message_event(0, "Fix login"), {"id": 1, "type": "heartbeat"}]
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/events")
                .query_param("queue_id", "q1")
                .query_param("last_event_id", "1");
            then.status(200).json_body(json!({"result": "success", "events": []}));
        });

        let zulip = client(&server);
        let batch = zulip.poll_messages().await.unwrap();
        let empty = zulip.poll_messages().await.unwrap();

        register.assert_calls(1);
        first.assert_calls(1);
        second.assert_calls(1);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].content, "Fix login");
        assert_eq!(batch[0].stream_name, "youtrack");
        assert_eq!(batch[0].kind, MessageKind::Stream);
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn expired_queue_is_re_registered() {
        let server = MockServer::start();
        let register = server.mock(|when, then| {
            when.method(POST).path("/api/v1/register");
            then.status(200)
                .json_body(json!({"result": "success", "queue_id": "q1", "last_event_id": 5}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/events");
            then.status(400).json_body(json!({
                "result": "error",
                "msg": "Bad event queue ID: q1",
                "code": "BAD_EVENT_QUEUE_ID",
                "queue_id": "q1"
            }));
        });

        let zulip = client(&server);
        let err = zulip.poll_messages().await.unwrap_err();
        assert!(matches!(err, ChatError::QueueExpired));
        assert!(zulip.queue.lock().await.is_none());

        let _ = zulip.poll_messages().await;
        register.assert_calls(2);
    }

    #[tokio::test]
    async fn sends_stream_reply() {
        let server = MockServer::start();
        let send = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/messages")
                .body_includes("type=stream")
                .body_includes("to=7")
                .body_includes("topic=create+issue")
                .body_includes("content=Created+APP-1");
            then.status(200).json_body(json!({"result": "success", "id": 555}));
        });

        let target = ReplyTarget {
            stream_id: Some(7),
            stream_name: "youtrack".into(),
            topic: "create issue".into(),
        };
        client(&server).send_reply(&target, "Created APP-1").await.unwrap();

        send.assert();
    }

    #[tokio::test]
    async fn unauthorized_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/register");
            then.status(401).json_body(json!({"result": "error", "msg": "Invalid API key"}));
        });

        let err = client(&server).poll_messages().await.unwrap_err();

        assert!(matches!(err, ChatError::AuthenticationFailed));
    }
}
