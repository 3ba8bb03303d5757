//! Support triage acknowledgement.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::handlers::{MessageHandler, TurnError, TurnOutcome};
use crate::ports::{ChatTransport, InboundMessage};

pub const TRIAGE_URGENT: &str = "Acknowledged: marking as urgent triage.";
pub const TRIAGE_NOTED: &str = "Triage noted. Our team will follow up.";

/// Acknowledges triage requests, flagging ones that mention "urgent".
pub struct SupportTriageHandler {
    chat: Arc<dyn ChatTransport>,
}

impl SupportTriageHandler {
    pub fn new(chat: Arc<dyn ChatTransport>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl MessageHandler for SupportTriageHandler {
    async fn handle(&self, message: &InboundMessage) -> Result<TurnOutcome, TurnError> {
        let urgent = message.content.to_lowercase().contains("urgent");
        let reply = if urgent { TRIAGE_URGENT } else { TRIAGE_NOTED };
        self.chat.send_reply(&message.reply_target(), reply).await?;
        tracing::debug!(message_id = message.id, urgent, "Triage acknowledged");
        Ok(TurnOutcome::Replied)
    }

    fn name(&self) -> &'static str {
        "SupportTriage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::RecordingTransport;
    use crate::ports::MessageKind;

    fn message(content: &str) -> InboundMessage {
        InboundMessage {
            id: 5,
            kind: MessageKind::Stream,
            stream_id: Some(2),
            stream_name: "support".into(),
            topic: "triage".into(),
            sender_id: 8,
            sender_email: "ops@example.com".into(),
            sender_name: "Ops".into(),
            content: content.into(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn urgent_requests_are_flagged() {
        let chat = RecordingTransport::new();
        let handler = SupportTriageHandler::new(Arc::new(chat.clone()));

        let outcome = handler.handle(&message("URGENT: checkout is down")).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Replied);
        assert_eq!(chat.last_text().as_deref(), Some(TRIAGE_URGENT));
        assert_eq!(chat.sent()[0].target.topic, "triage");
    }

    #[tokio::test]
    async fn other_requests_are_noted() {
        let chat = RecordingTransport::new();
        let handler = SupportTriageHandler::new(Arc::new(chat.clone()));

        handler.handle(&message("Printer jams sometimes")).await.unwrap();

        assert_eq!(chat.last_text().as_deref(), Some(TRIAGE_NOTED));
    }
}
