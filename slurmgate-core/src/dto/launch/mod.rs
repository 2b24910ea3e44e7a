//! Launch DTOs
//!
//! The runner launch request posted by the CI side.

use serde::{Deserialize, Serialize};

/// Request to start one ephemeral runner for a repository
///
/// Everything except the repository identity and launcher token is optional
/// and untrusted free-form text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    /// Repository identity, matched exactly against the configured repositories
    #[serde(rename = "gitHubURL")]
    pub git_hub_url: String,

    /// One-time registration token forwarded into the job script
    pub launcher_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_name: Option<String>,

    /// Comma/space-delimited runner labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_labels: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<String>,
}

impl LaunchRequest {
    pub fn new(git_hub_url: impl Into<String>, launcher_token: impl Into<String>) -> Self {
        Self {
            git_hub_url: git_hub_url.into(),
            launcher_token: launcher_token.into(),
            ..Default::default()
        }
    }

    /// Runner name, with an empty string treated as absent
    pub fn runner_name(&self) -> Option<&str> {
        non_empty(&self.runner_name)
    }

    /// Runner labels, with an empty string treated as absent
    pub fn runner_labels(&self) -> Option<&str> {
        non_empty(&self.runner_labels)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
