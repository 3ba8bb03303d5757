//! Issue-flow dialogue step.
//!
//! One model call under the `IssueFlowTurn` contract, normalized into a
//! [`DialogueOutcome`]. When a first message yields nothing usable, a
//! single-shot `IssueParse` call tries to recover a draft.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::catalog::ProjectCatalog;
use crate::domain::conversation::Turn;
use crate::domain::dialogue::{
    flow_messages, issue_flow_schema, issue_parse_schema, normalize_cut_off_response,
    normalize_flow_response, normalize_parse_response, parse_messages, DialogueOutcome,
    Disposition, FlowState, DIALOGUE_TEMPERATURE, ISSUE_FLOW_SCHEMA_NAME,
    ISSUE_FLOW_SYSTEM_PROMPT, ISSUE_PARSE_SCHEMA_NAME, ISSUE_PARSE_SYSTEM_PROMPT,
};
use crate::domain::foundation::ConversationKey;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, RequestMetadata, ResponseFormat,
};

/// Sampling and time limits for dialogue calls.
#[derive(Debug, Clone)]
pub struct DialogueSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound for a single model call.
    pub call_timeout: Duration,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            temperature: DIALOGUE_TEMPERATURE,
            max_tokens: 1200,
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Everything the model sees for one turn.
#[derive(Debug, Clone, Copy)]
pub struct DialogueInput<'a> {
    pub key: &'a ConversationKey,
    pub user_text: &'a str,
    pub prior_state: Option<&'a FlowState>,
    pub history: &'a [Turn],
}

impl DialogueInput<'_> {
    /// No prior state and no history.
    fn is_first_message(&self) -> bool {
        self.prior_state.map_or(true, FlowState::is_empty) && self.history.is_empty()
    }
}

/// Runs dialogue steps against a language model.
pub struct IssueFlowDialogue {
    ai_provider: Arc<dyn AIProvider>,
    catalog: Arc<ProjectCatalog>,
    settings: DialogueSettings,
}

impl IssueFlowDialogue {
    pub fn new(ai_provider: Arc<dyn AIProvider>, catalog: Arc<ProjectCatalog>) -> Self {
        Self {
            ai_provider,
            catalog,
            settings: DialogueSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DialogueSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Evaluates one turn.
    ///
    /// Contract violations by the model are absorbed into the outcome; only
    /// transport failures and timeouts surface as errors.
    pub async fn evaluate(&self, input: DialogueInput<'_>) -> Result<DialogueOutcome, AIError> {
        let request = CompletionRequest::new(RequestMetadata::traced(input.key.clone()))
            .with_system_prompt(ISSUE_FLOW_SYSTEM_PROMPT)
            .with_messages(flow_messages(
                &self.catalog,
                input.prior_state,
                input.history,
                input.user_text,
            ))
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
            .with_response_format(ResponseFormat::json_schema(
                ISSUE_FLOW_SCHEMA_NAME,
                issue_flow_schema(),
                false,
            ));

        let response = self.call(input.key, request).await?;
        let outcome = if response.finish_reason.is_cut_off() {
            normalize_cut_off_response(input.prior_state)
        } else {
            normalize_flow_response(&response.content, input.prior_state, &self.catalog)
        };

        if let Disposition::Degraded(reason) = &outcome.disposition {
            tracing::warn!(conversation = %input.key, ?reason, "Model response unusable");
            if input.is_first_message() {
                if let Some(parsed) = self.parse_single_shot(input).await {
                    return Ok(parsed);
                }
            }
        }

        Ok(outcome)
    }

    /// Single-shot draft recovery. Any failure keeps the degraded outcome.
    async fn parse_single_shot(&self, input: DialogueInput<'_>) -> Option<DialogueOutcome> {
        let request = CompletionRequest::new(RequestMetadata::traced(input.key.clone()))
            .with_system_prompt(ISSUE_PARSE_SYSTEM_PROMPT)
            .with_messages(parse_messages(input.user_text))
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
            .with_response_format(ResponseFormat::json_schema(
                ISSUE_PARSE_SCHEMA_NAME,
                issue_parse_schema(),
                true,
            ));

        match self.call(input.key, request).await {
            Ok(response) if response.finish_reason.is_cut_off() => None,
            Ok(response) => {
                let parsed = normalize_parse_response(&response.content, &self.catalog);
                if parsed.is_none() {
                    tracing::debug!(conversation = %input.key, "Single-shot parse produced no draft");
                }
                parsed
            }
            Err(err) => {
                tracing::warn!(conversation = %input.key, error = %err, "Single-shot parse failed");
                None
            }
        }
    }

    async fn call(
        &self,
        key: &ConversationKey,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AIError> {
        let timeout = self.settings.call_timeout;
        let response = tokio::time::timeout(timeout, self.ai_provider.complete(request))
            .await
            .map_err(|_| AIError::timeout(timeout))??;

        if response.finish_reason.is_cut_off() {
            tracing::warn!(
                conversation = %key,
                finish_reason = ?response.finish_reason,
                completion_tokens = response.usage.completion_tokens,
                max_tokens = self.settings.max_tokens,
                "Model answer is incomplete"
            );
        }
        Ok(response)
    }
}
