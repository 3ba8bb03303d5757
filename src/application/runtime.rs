//! Chat runtime loop.
//!
//! Polls the chat transport, routes each message and dispatches it to its own
//! task, then drains in-flight turns on shutdown. The turn slot of a
//! conversation is reserved before its task is spawned, so turns of one
//! conversation run one at a time in arrival order.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinSet;

use super::handlers::{TurnError, TurnOutcome};
use super::router::Router;
use super::turn_queue::TurnQueue;
use crate::ports::{ChatError, ChatTransport};

/// Fatal runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Chat transport failed permanently: {0}")]
    Chat(#[from] ChatError),
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeReport {
    /// Messages handed to a handler.
    pub dispatched: usize,
    /// Turns that returned an error or panicked.
    pub errors: usize,
}

/// Event loop connecting the chat transport to the routed handlers.
pub struct ChatRuntime {
    chat: Arc<dyn ChatTransport>,
    router: Router,
    turns: TurnQueue,
    poll_retry: Duration,
}

impl ChatRuntime {
    pub fn new(chat: Arc<dyn ChatTransport>, router: Router) -> Self {
        Self {
            chat,
            router,
            turns: TurnQueue::new(),
            poll_retry: Duration::from_secs(5),
        }
    }

    pub fn with_poll_retry(mut self, delay: Duration) -> Self {
        self.poll_retry = delay;
        self
    }

    /// Runs until Ctrl-C.
    pub async fn run(&self) -> Result<RuntimeReport, RuntimeError> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs until `shutdown` completes, then waits for in-flight turns.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<RuntimeReport, RuntimeError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut tasks: JoinSet<Result<TurnOutcome, TurnError>> = JoinSet::new();
        let mut report = RuntimeReport::default();

        let result = loop {
            let polled = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break Ok(());
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    record(joined, &mut report);
                    continue;
                }
                polled = self.chat.poll_messages() => polled,
            };

            match polled {
                Ok(batch) if batch.is_empty() => tokio::task::yield_now().await,
                Ok(batch) => {
                    for message in batch {
                        let Some(handler) = self.router.route(&message) else {
                            tracing::trace!(message_id = message.id, "No route for message");
                            continue;
                        };
                        let handler = Arc::clone(handler);
                        let mut slot =
                            message.conversation_key().map(|key| self.turns.reserve(&key));
                        tracing::debug!(
                            message_id = message.id,
                            sender = %message.sender_email,
                            handler = handler.name(),
                            "Dispatching message"
                        );
                        report.dispatched += 1;
                        tasks.spawn(async move {
                            if let Some(slot) = slot.as_mut() {
                                slot.ready().await;
                            }
                            let outcome = handler.handle(&message).await;
                            drop(slot);
                            outcome
                        });
                    }
                }
                Err(ChatError::QueueExpired) => continue,
                Err(err) if err.is_transient() => {
                    tracing::warn!(error = %err, retry_in = ?self.poll_retry, "Polling failed");
                    tokio::select! {
                        _ = &mut shutdown => break Ok(()),
                        _ = tokio::time::sleep(self.poll_retry) => {}
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "Polling failed permanently");
                    break Err(RuntimeError::Chat(err));
                }
            }
        };

        if !tasks.is_empty() {
            tracing::info!(in_flight = tasks.len(), "Draining in-flight turns");
        }
        while let Some(joined) = tasks.join_next().await {
            record(joined, &mut report);
        }

        tracing::info!(dispatched = report.dispatched, errors = report.errors, "Runtime stopped");
        result.map(|_| report)
    }
}

fn record(
    joined: Result<Result<TurnOutcome, TurnError>, tokio::task::JoinError>,
    report: &mut RuntimeReport,
) {
    match joined {
        Ok(Ok(outcome)) => tracing::debug!(?outcome, "Turn finished"),
        Ok(Err(err)) => {
            report.errors += 1;
            tracing::error!(error = %err, "Turn failed");
        }
        Err(err) => {
            report.errors += 1;
            tracing::error!(error = %err, "Turn task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::chat::RecordingTransport;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::adapters::tracker::MockIssueTracker;
    use crate::application::handlers::{
        FileIssueHandler, IssueFlowDialogue, MessageHandler, SupportTriageHandler,
    };
    use crate::application::router::Route;
    use crate::domain::catalog::{ProjectCatalog, ProjectCatalogEntry};
    use crate::ports::{InboundMessage, MessageKind};
    use serde_json::json;

    fn message(id: u64, topic: &str, sender: &str) -> InboundMessage {
        InboundMessage {
            id,
            kind: MessageKind::Stream,
            stream_id: Some(1),
            stream_name: "youtrack".into(),
            topic: topic.into(),
            sender_id: id,
            sender_email: sender.into(),
            sender_name: "Dev".into(),
            content: "Login times out".into(),
            timestamp: 0,
        }
    }

    fn runtime(chat: RecordingTransport, ai: MockAIProvider) -> ChatRuntime {
        let catalog = Arc::new(
            ProjectCatalog::from_entries(vec![
                ProjectCatalogEntry::new("0-1", "APP", "Mobile App", "").unwrap()
            ])
            .unwrap(),
        );
        let chat: Arc<dyn ChatTransport> = Arc::new(chat);
        let issues: Arc<dyn MessageHandler> = Arc::new(FileIssueHandler::new(
            IssueFlowDialogue::new(Arc::new(ai), catalog),
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(MockIssueTracker::default()),
            Arc::clone(&chat),
            "https://tracker.example.com",
        ));
        let triage: Arc<dyn MessageHandler> =
            Arc::new(SupportTriageHandler::new(Arc::clone(&chat)));
        let router = Router::new("bot@example.com")
            .with_route(Route::new(issues).stream("youtrack").topic("create issue"))
            .with_route(Route::new(triage).stream("support").topic("triage"));
        ChatRuntime::new(chat, router).with_poll_retry(Duration::from_millis(10))
    }

    fn ask(reply: &str) -> serde_json::Value {
        json!({"reply": reply, "intent": "ask", "state": {}})
    }

    #[tokio::test]
    async fn dispatches_only_routed_messages_and_drains() {
        let chat = RecordingTransport::new().with_batch(vec![
            message(1, "create issue", "dev@example.com"),
            message(2, "general", "dev@example.com"),
            message(3, "create issue", "bot@example.com"),
        ]);
        let ai = MockAIProvider::new()
            .with_delay(Duration::from_millis(30))
            .with_json(ask("Which project?"));

        let report = runtime(chat.clone(), ai.clone())
            .run_until(tokio::time::sleep(Duration::from_millis(5)))
            .await
            .unwrap();

        assert_eq!(report.dispatched, 1);
        assert_eq!(report.errors, 0);
        assert_eq!(ai.call_count(), 1);
        assert_eq!(chat.last_text().as_deref(), Some("Which project?"));
    }

    #[tokio::test]
    async fn each_route_gets_its_own_handler() {
        let mut triage = message(4, "triage", "ops@example.com");
        triage.stream_name = "support".into();
        triage.content = "urgent: payments failing".into();
        let chat = RecordingTransport::new().with_batch(vec![triage]);
        let ai = MockAIProvider::new();

        let report = runtime(chat.clone(), ai.clone())
            .run_until(tokio::time::sleep(Duration::from_millis(20)))
            .await
            .unwrap();

        assert_eq!(report.dispatched, 1);
        assert_eq!(ai.call_count(), 0);
        assert_eq!(
            chat.last_text().as_deref(),
            Some("Acknowledged: marking as urgent triage.")
        );
    }

    #[tokio::test]
    async fn failed_turns_are_counted() {
        let chat = RecordingTransport::new()
            .with_batch(vec![message(1, "create issue", "dev@example.com")]);
        chat.fail_sends();
        let ai = MockAIProvider::new().with_json(ask("Which project?"));

        let report = runtime(chat, ai)
            .run_until(tokio::time::sleep(Duration::from_millis(20)))
            .await
            .unwrap();

        assert_eq!(report, RuntimeReport { dispatched: 1, errors: 1 });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_sender_burst_reaches_the_model_in_arrival_order() {
        let texts: Vec<String> = (0..6).map(|n| format!("m{n}")).collect();

        for _ in 0..10 {
            let burst = texts
                .iter()
                .enumerate()
                .map(|(n, text)| {
                    let mut msg = message(100 + n as u64, "create issue", "dev@example.com");
                    msg.sender_id = 42;
                    msg.content = text.clone();
                    msg
                })
                .collect();
            let chat = RecordingTransport::new().with_batch(burst);
            let ai = (0..6).fold(MockAIProvider::new(), |ai, n| {
                ai.with_json(ask(&format!("reply {n}")))
            });

            let report = runtime(chat, ai.clone())
                .run_until(tokio::time::sleep(Duration::from_millis(5)))
                .await
                .unwrap();

            assert_eq!(report, RuntimeReport { dispatched: 6, errors: 0 });
            let seen: Vec<String> = ai
                .get_calls()
                .iter()
                .filter_map(|call| call.last_user_text().map(str::to_string))
                .collect();
            assert_eq!(seen, texts);
        }
    }
}
