//! Issue filing handler.
//!
//! Drives one inbound chat message through the issue flow:
//! `received -> dialogue-evaluated -> previewed | clarified | filed | cancelled | failed`.
//!
//! History and flow state are committed once per turn, before the reply is
//! sent. Turns that fail against the model or the tracker commit nothing, so
//! the user can simply retry. Turns of one conversation must not overlap;
//! [`ChatRuntime`](crate::application::ChatRuntime) runs them in arrival order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::dialogue_step::{DialogueInput, IssueFlowDialogue};
use crate::application::handlers::{MessageHandler, TurnError, TurnOutcome};
use crate::domain::conversation::Turn;
use crate::domain::dialogue::{tracker_failure_reply, DialogueDecision, Intent, GENERIC_FAILURE};
use crate::domain::foundation::ConversationKey;
use crate::domain::issue::{append_preview, render_preview, FiledIssue};
use crate::ports::{
    ChatTransport, ConversationStore, CreatedIssue, InboundMessage, IssueTracker, NewIssue,
    ReplyTarget, StateUpdate, TrackerError, TurnCommit,
};

/// Reply when no tracker URL or token is configured.
pub const TRACKER_NOT_CONFIGURED: &str = "The issue tracker is not configured. \
Set ISSUE_SCRIBE__TRACKER__URL and ISSUE_SCRIBE__TRACKER__TOKEN.";

struct TrackerLink {
    client: Arc<dyn IssueTracker>,
    base_url: String,
    timeout: Duration,
}

/// Handler for issue-flow chat turns.
pub struct FileIssueHandler {
    dialogue: IssueFlowDialogue,
    store: Arc<dyn ConversationStore>,
    tracker: Option<TrackerLink>,
    chat: Arc<dyn ChatTransport>,
}

impl FileIssueHandler {
    /// Creates a new handler with the given dependencies.
    pub fn new(
        dialogue: IssueFlowDialogue,
        store: Arc<dyn ConversationStore>,
        tracker: Arc<dyn IssueTracker>,
        chat: Arc<dyn ChatTransport>,
        tracker_base_url: impl Into<String>,
    ) -> Self {
        Self {
            dialogue,
            store,
            tracker: Some(TrackerLink {
                client: tracker,
                base_url: tracker_base_url.into(),
                timeout: Duration::from_secs(30),
            }),
            chat,
        }
    }

    /// A handler that answers every turn with [`TRACKER_NOT_CONFIGURED`].
    pub fn without_tracker(
        dialogue: IssueFlowDialogue,
        store: Arc<dyn ConversationStore>,
        chat: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            dialogue,
            store,
            tracker: None,
            chat,
        }
    }

    pub fn with_tracker_timeout(mut self, timeout: Duration) -> Self {
        if let Some(link) = self.tracker.as_mut() {
            link.timeout = timeout;
        }
        self
    }

    /// Handles one inbound message.
    pub async fn handle(&self, message: &InboundMessage) -> Result<TurnOutcome, TurnError> {
        let text = message.content.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        let Some(key) = message.conversation_key() else {
            return Ok(TurnOutcome::Ignored);
        };
        let target = message.reply_target();

        let Some(tracker) = self.tracker.as_ref() else {
            tracing::warn!(conversation = %key, "Issue tracker not configured");
            self.chat.send_reply(&target, TRACKER_NOT_CONFIGURED).await?;
            return Ok(TurnOutcome::NotConfigured);
        };

        let (prior_state, history) =
            futures::try_join!(self.store.get_state(&key), self.store.get_history(&key))?;

        let input = DialogueInput {
            key: &key,
            user_text: text,
            prior_state: prior_state.as_ref(),
            history: &history,
        };
        let outcome = match self.dialogue.evaluate(input).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(conversation = %key, error = %err, "Dialogue step failed");
                self.chat.send_reply(&target, GENERIC_FAILURE).await?;
                return Ok(TurnOutcome::Failed);
            }
        };

        let degraded = outcome.is_degraded();
        let decision = outcome.decision;
        tracing::info!(
            conversation = %key,
            intent = %decision.intent,
            disposition = ?outcome.disposition,
            "Dialogue step evaluated"
        );

        match decision.intent {
            Intent::Ask => self.ask(&key, &target, text, decision, degraded).await,
            Intent::Cancel => self.cancel(&key, &target, decision).await,
            Intent::Create => self.create(tracker, &key, &target, text, decision).await,
        }
    }

    async fn ask(
        &self,
        key: &ConversationKey,
        target: &ReplyTarget,
        text: &str,
        decision: DialogueDecision,
        degraded: bool,
    ) -> Result<TurnOutcome, TurnError> {
        let (reply, outcome) = match decision.issue.as_ref().filter(|d| !d.is_blank()) {
            Some(draft) => {
                let preview = render_preview(draft, decision.project.as_ref());
                (append_preview(&decision.reply, &preview), TurnOutcome::Previewed)
            }
            None => (decision.reply.clone(), TurnOutcome::Clarified),
        };

        let state = if degraded {
            StateUpdate::Keep
        } else {
            StateUpdate::Replace(decision.state)
        };
        let turns = vec![Turn::user(text), Turn::assistant(reply.clone())];
        self.store.commit(key, TurnCommit::new(turns, state)).await?;

        self.send_committed(key, target, &reply).await?;
        Ok(outcome)
    }

    async fn cancel(
        &self,
        key: &ConversationKey,
        target: &ReplyTarget,
        decision: DialogueDecision,
    ) -> Result<TurnOutcome, TurnError> {
        self.store.commit(key, TurnCommit::clear()).await?;
        self.send_committed(key, target, &decision.reply).await?;
        tracing::info!(conversation = %key, "Issue flow cancelled");
        Ok(TurnOutcome::Cancelled)
    }

    async fn create(
        &self,
        tracker: &TrackerLink,
        key: &ConversationKey,
        target: &ReplyTarget,
        text: &str,
        decision: DialogueDecision,
    ) -> Result<TurnOutcome, TurnError> {
        let (Some(draft), Some(project)) = (decision.issue.as_ref(), decision.project.as_ref())
        else {
            // Accepted creates always carry both; treat anything else as a question.
            return self.ask(key, target, text, decision, false).await;
        };

        let issue = NewIssue {
            summary: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            project_id: project.id.clone(),
            issue_type: Some(draft.type_or_default().to_string()),
        };

        let created = match file(tracker, issue).await {
            Ok(created) => created,
            Err(err) => {
                tracing::error!(
                    conversation = %key,
                    project = %project.key,
                    error = %err,
                    "Issue creation failed"
                );
                let reply = tracker_failure_reply(&err.user_detail());
                self.chat.send_reply(target, &reply).await?;
                return Ok(TurnOutcome::Failed);
            }
        };

        let filed = FiledIssue::new(&tracker.base_url, created.display_id());
        let reply = format!("{}\n{}", decision.reply, filed.confirmation())
            .trim()
            .to_string();

        // The issue exists now; clear the flow even if the reply is lost.
        self.store.commit(key, TurnCommit::clear()).await?;
        self.send_committed(key, target, &reply).await?;

        tracing::info!(conversation = %key, issue = %filed.id_readable, "Issue filed");
        Ok(TurnOutcome::Filed(filed))
    }

    /// Sends a reply for a turn whose state is already committed.
    async fn send_committed(
        &self,
        key: &ConversationKey,
        target: &ReplyTarget,
        reply: &str,
    ) -> Result<(), TurnError> {
        if let Err(err) = self.chat.send_reply(target, reply).await {
            tracing::error!(
                conversation = %key,
                error = %err,
                reply_chars = reply.chars().count(),
                "Reply not delivered; conversation state already advanced"
            );
            return Err(err.into());
        }
        Ok(())
    }
}

async fn file(tracker: &TrackerLink, issue: NewIssue) -> Result<CreatedIssue, TrackerError> {
    match tokio::time::timeout(tracker.timeout, tracker.client.create_issue(issue)).await {
        Ok(result) => result,
        Err(_) => Err(TrackerError::Timeout {
            timeout_secs: tracker.timeout.as_secs(),
        }),
    }
}

#[async_trait]
impl MessageHandler for FileIssueHandler {
    async fn handle(&self, message: &InboundMessage) -> Result<TurnOutcome, TurnError> {
        FileIssueHandler::handle(self, message).await
    }

    fn name(&self) -> &'static str {
        "FileIssue"
    }
}
