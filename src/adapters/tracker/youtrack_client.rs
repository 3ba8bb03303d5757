//! YouTrack Issue Tracker - Implementation of IssueTracker over the YouTrack REST API.
//!
//! Creates issues with `POST /api/issues` using a permanent bearer token. The
//! issue type is set through the `Type` single-enum custom field.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{CreatedIssue, IssueTracker, NewIssue, TrackerError};

/// Fields requested back from the create call.
const ISSUE_FIELDS: &str =
    "id,idReadable,summary,description,created,updated,project(id,name,shortName)";

/// Configuration for the YouTrack client.
#[derive(Debug, Clone)]
pub struct YouTrackConfig {
    /// Instance URL, e.g. `https://example.youtrack.cloud`.
    pub base_url: String,
    token: Secret<String>,
    pub timeout: Duration,
}

impl YouTrackConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Secret::new(token.into()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// YouTrack API client.
pub struct YouTrackClient {
    config: YouTrackConfig,
    client: Client,
}

impl YouTrackClient {
    pub fn new(config: YouTrackConfig) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TrackerError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Base URL used for issue deep links.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn build_request(issue: &NewIssue) -> YouTrackIssueRequest {
        let description = Some(issue.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let custom_fields = issue
            .issue_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|name| {
                vec![CustomField {
                    name: "Type".to_string(),
                    kind: "SingleEnumIssueCustomField".to_string(),
                    value: EnumValue {
                        name: name.to_string(),
                    },
                }]
            });

        YouTrackIssueRequest {
            summary: issue.summary.clone(),
            description,
            project: ProjectRef {
                id: issue.project_id.clone(),
            },
            custom_fields,
        }
    }
}

#[async_trait]
impl IssueTracker for YouTrackClient {
    async fn create_issue(&self, issue: NewIssue) -> Result<CreatedIssue, TrackerError> {
        let body = Self::build_request(&issue);
        tracing::debug!(project_id = %issue.project_id, "Creating tracker issue");

        let response = self
            .client
            .post(format!("{}/api/issues", self.config.base_url))
            .bearer_auth(self.config.token.expose_secret())
            .header("Accept", "application/json")
            .query(&[("fields", ISSUE_FIELDS)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TrackerError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    TrackerError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;

        match status {
            200..=299 => {
                let created: YouTrackIssueResponse = serde_json::from_str(&text)
                    .map_err(|e| TrackerError::Transport(format!("Invalid tracker response: {}", e)))?;
                tracing::info!(issue = %created.id_readable, id = %created.id, "Created tracker issue");
                Ok(CreatedIssue {
                    id: created.id,
                    id_readable: created.id_readable,
                    summary: created.summary,
                })
            }
            400..=499 => {
                tracing::error!(status, body = %text, "Tracker rejected issue");
                Err(TrackerError::Rejected {
                    status,
                    message: rejection_message(status, &text),
                })
            }
            _ => {
                tracing::error!(status, body = %text, "Tracker request failed");
                Err(TrackerError::Transport(format!("HTTP {}", status)))
            }
        }
    }
}

/// Chat-safe reason for a rejection.
///
/// Only the `error_description` or `error` field of a JSON body is passed on;
/// anything else (HTML error pages, proxies) becomes a generic message.
fn rejection_message(status: u16, body: &str) -> String {
    serde_json::from_str::<YouTrackError>(body)
        .ok()
        .and_then(|e| {
            [e.error_description, e.error]
                .into_iter()
                .flatten()
                .map(|text| text.trim().to_string())
                .find(|text| !text.is_empty())
        })
        .unwrap_or_else(|| format!("the tracker rejected the request (HTTP {status})"))
}

// ----- YouTrack API Types -----

#[derive(Debug, Serialize)]
struct YouTrackIssueRequest {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    project: ProjectRef,
    #[serde(rename = "customFields", skip_serializing_if = "Option::is_none")]
    custom_fields: Option<Vec<CustomField>>,
}

#[derive(Debug, Serialize)]
struct ProjectRef {
    id: String,
}

#[derive(Debug, Serialize)]
struct CustomField {
    name: String,
    #[serde(rename = "$type")]
    kind: String,
    value: EnumValue,
}

#[derive(Debug, Serialize)]
struct EnumValue {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YouTrackIssueResponse {
    id: String,
    #[serde(default)]
    id_readable: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct YouTrackError {
    error: Option<String>,
    error_description: Option<String>,
}
