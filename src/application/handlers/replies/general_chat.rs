//! General chat echo.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::handlers::{MessageHandler, TurnError, TurnOutcome};
use crate::ports::{ChatTransport, InboundMessage};

/// Replies with the message's own text.
pub struct GeneralChatHandler {
    chat: Arc<dyn ChatTransport>,
}

impl GeneralChatHandler {
    pub fn new(chat: Arc<dyn ChatTransport>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl MessageHandler for GeneralChatHandler {
    async fn handle(&self, message: &InboundMessage) -> Result<TurnOutcome, TurnError> {
        let text = message.content.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        self.chat.send_reply(&message.reply_target(), text).await?;
        Ok(TurnOutcome::Replied)
    }

    fn name(&self) -> &'static str {
        "GeneralChat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::RecordingTransport;
    use crate::ports::MessageKind;

    fn message(content: &str) -> InboundMessage {
        InboundMessage {
            id: 3,
            kind: MessageKind::Stream,
            stream_id: Some(4),
            stream_name: "general".into(),
            topic: "general chat".into(),
            sender_id: 8,
            sender_email: "dev@example.com".into(),
            sender_name: "Dev".into(),
            content: content.into(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn echoes_trimmed_text() {
        let chat = RecordingTransport::new();
        let handler = GeneralChatHandler::new(Arc::new(chat.clone()));

        let outcome = handler.handle(&message("  hello there \n")).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Replied);
        assert_eq!(chat.last_text().as_deref(), Some("hello there"));
    }

    #[tokio::test]
    async fn blank_text_gets_no_reply() {
        let chat = RecordingTransport::new();
        let handler = GeneralChatHandler::new(Arc::new(chat.clone()));

        let outcome = handler.handle(&message("   ")).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Ignored);
        assert!(chat.sent().is_empty());
    }
}
