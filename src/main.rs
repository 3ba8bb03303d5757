//! Issue Scribe process entry point.
//!
//! Loads configuration, wires the Zulip, OpenAI-compatible and YouTrack
//! adapters into the routed handlers and runs the chat loop until Ctrl-C.

use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use issue_scribe::adapters::ai::{HeuristicProvider, OpenAIConfig, OpenAIProvider};
use issue_scribe::adapters::chat::{ZulipClient, ZulipConfig};
use issue_scribe::adapters::storage::InMemoryConversationStore;
use issue_scribe::adapters::tracker::{YouTrackClient, YouTrackConfig};
use issue_scribe::application::{
    ChatRuntime, DialogueSettings, FileIssueHandler, GeneralChatHandler, IssueFlowDialogue,
    MessageHandler, Route, Router, RuntimeError, SupportTriageHandler,
};
use issue_scribe::config::{AppConfig, ConfigError};
use issue_scribe::domain::catalog::{CatalogError, ProjectCatalog};
use issue_scribe::ports::{AIError, AIProvider, ChatError, ChatTransport, TrackerError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Project catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Language model client: {0}")]
    Ai(#[from] AIError),

    #[error("Chat client: {0}")]
    Chat(#[from] ChatError),

    #[error("Tracker client: {0}")]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn secret(value: &Option<Secret<String>>) -> String {
    value
        .as_ref()
        .map(|s| s.expose_secret().clone())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.logging.init().map_err(ConfigError::from)?;
    config.validate().map_err(ConfigError::from)?;

    let catalog = ProjectCatalog::from_yaml_file(&config.conversation.catalog_path)?;
    tracing::info!(
        projects = catalog.len(),
        path = %config.conversation.catalog_path.display(),
        "Loaded project catalog"
    );

    let ai: Arc<dyn AIProvider> = if config.ai.has_api_key() {
        Arc::new(OpenAIProvider::new(
            OpenAIConfig::new(secret(&config.ai.api_key))
                .with_model(config.ai.model.clone())
                .with_base_url(config.ai.base_url.clone())
                .with_timeout(config.ai.timeout())
                .with_max_retries(config.ai.max_retries)
                .with_app_attribution(
                    config.ai.http_referer.clone(),
                    config.ai.app_title.clone(),
                ),
        )?)
    } else {
        tracing::warn!("No AI API key configured; drafting issues heuristically");
        Arc::new(HeuristicProvider::new())
    };

    let chat: Arc<dyn ChatTransport> = Arc::new(ZulipClient::new(ZulipConfig::new(
        config.chat.url.clone(),
        config.chat.email.clone(),
        secret(&config.chat.api_key),
    ))?);

    let store = Arc::new(InMemoryConversationStore::with_limits(
        config.conversation.history_limit,
        config.conversation.idle_ttl_secs,
    ));

    // The retrying adapter call may take up to (retries + 1) timeouts.
    let dialogue_budget = config
        .ai
        .timeout()
        .saturating_mul(config.ai.max_retries.saturating_add(1));
    let dialogue = IssueFlowDialogue::new(ai, Arc::new(catalog)).with_settings(DialogueSettings {
        temperature: config.ai.temperature,
        max_tokens: config.ai.max_tokens,
        call_timeout: dialogue_budget,
    });

    let issues = if config.tracker.is_configured() {
        let tracker = YouTrackClient::new(
            YouTrackConfig::new(config.tracker.url.clone(), secret(&config.tracker.token))
                .with_timeout(config.tracker.timeout()),
        )?;
        FileIssueHandler::new(
            dialogue,
            store,
            Arc::new(tracker),
            Arc::clone(&chat),
            config.tracker.url.clone(),
        )
        .with_tracker_timeout(config.tracker.timeout())
    } else {
        tracing::warn!("Issue tracker URL or token missing; issue requests will be declined");
        FileIssueHandler::without_tracker(dialogue, store, Arc::clone(&chat))
    };

    let issues: Arc<dyn MessageHandler> = Arc::new(issues);
    let triage: Arc<dyn MessageHandler> = Arc::new(SupportTriageHandler::new(Arc::clone(&chat)));
    let general: Arc<dyn MessageHandler> = Arc::new(GeneralChatHandler::new(Arc::clone(&chat)));
    let router = Router::new(&config.chat.email)
        .with_route(
            Route::new(issues)
                .stream(&config.chat.trigger_stream)
                .topic(&config.chat.trigger_topic),
        )
        .with_route(Route::new(triage).stream("support").topic("triage"))
        .with_route(Route::new(general).stream("general").topic("general chat"));

    tracing::info!(
        stream = %config.chat.trigger_stream,
        topic = %config.chat.trigger_topic,
        routes = router.len(),
        model = %config.ai.model,
        "Issue scribe started"
    );

    let report = ChatRuntime::new(chat, router)
        .with_poll_retry(config.chat.poll_retry())
        .run()
        .await?;

    tracing::info!(dispatched = report.dispatched, errors = report.errors, "Issue scribe stopped");
    Ok(())
}
