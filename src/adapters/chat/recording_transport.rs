//! Recording chat transport for tests.
//!
//! Serves scripted inbound batches and records every reply sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{ChatError, ChatTransport, InboundMessage, ReplyTarget};

/// A reply captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub target: ReplyTarget,
    pub text: String,
}

/// In-memory transport that replays scripted batches.
///
/// Once the script is exhausted, polls return an empty batch.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inbound: Arc<Mutex<VecDeque<Vec<InboundMessage>>>>,
    sent: Arc<Mutex<Vec<SentReply>>>,
    fail_sends: Arc<Mutex<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for a future poll.
    pub fn with_batch(self, batch: Vec<InboundMessage>) -> Self {
        self.push_batch(batch);
        self
    }

    pub fn push_batch(&self, batch: Vec<InboundMessage>) {
        lock(&self.inbound).push_back(batch);
    }

    /// Make every subsequent send fail with a network error.
    pub fn fail_sends(&self) {
        *lock(&self.fail_sends) = true;
    }

    /// All replies sent so far.
    pub fn sent(&self) -> Vec<SentReply> {
        lock(&self.sent).clone()
    }

    /// Text of the most recent reply.
    pub fn last_text(&self) -> Option<String> {
        lock(&self.sent).last().map(|reply| reply.text.clone())
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn poll_messages(&self) -> Result<Vec<InboundMessage>, ChatError> {
        Ok(lock(&self.inbound).pop_front().unwrap_or_default())
    }

    async fn send_reply(&self, target: &ReplyTarget, text: &str) -> Result<(), ChatError> {
        if *lock(&self.fail_sends) {
            return Err(ChatError::Network("send disabled".into()));
        }
        lock(&self.sent).push(SentReply {
            target: target.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ReplyTarget {
        ReplyTarget {
            stream_id: Some(1),
            stream_name: "youtrack".into(),
            topic: "create issue".into(),
        }
    }

    #[tokio::test]
    async fn records_replies_in_order() {
        let transport = RecordingTransport::new();
        transport.send_reply(&target(), "one").await.unwrap();
        transport.send_reply(&target(), "two").await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].text, "one");
        assert_eq!(transport.last_text().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn exhausted_script_polls_empty() {
        let transport = RecordingTransport::new().with_batch(Vec::new());
        assert!(transport.poll_messages().await.unwrap().is_empty());
        assert!(transport.poll_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_sends_are_not_recorded() {
        let transport = RecordingTransport::new();
        transport.fail_sends();
        assert!(transport.send_reply(&target(), "lost").await.is_err());
        assert!(transport.sent().is_empty());
    }
}
