//! Launch Service
//!
//! Sequences one runner launch: translate, obtain a credential, submit.
//!
//! Translation runs first so an unknown repository never costs a credential
//! renewal. Submission is a single attempt; failures are logged and returned.
//! The config `logging` flag adds payload dumps at info level.

use slurmgate_client::ClientError;
use slurmgate_core::dto::launch::LaunchRequest;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::credential::CredentialError;
use crate::service::SubmittedJob;
use crate::state::AppState;
use crate::translator::{self, TranslateError};

/// Service error type
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("No configuration found for repository {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    CredentialUnavailable(#[from] CredentialError),

    #[error("Job submission failed: {0}")]
    Submission(#[from] ClientError),
}

impl From<TranslateError> for LaunchError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::ConfigNotFound(url) => LaunchError::ConfigNotFound(url),
        }
    }
}

/// Launch one ephemeral runner for the request's repository
#[tracing::instrument(
    name = "launch",
    skip_all,
    fields(request_id = %Uuid::new_v4(), repo = %req.git_hub_url)
)]
pub async fn launch_runner(state: &AppState, req: LaunchRequest) -> Result<SubmittedJob, LaunchError> {
    let config = state.config.snapshot();

    if config.verbose() {
        info!(
            "Received runner launch request: {}",
            serde_json::to_string_pretty(&req).unwrap_or_default()
        );
    }

    let translation = translator::translate(&config, &req)?;

    info!(
        "Launching runner as {} on partition {}",
        translation.slurm_user, translation.partition
    );

    if config.verbose() {
        info!(
            "Making request to scheduler: {}",
            serde_json::to_string(&translation.descriptor).unwrap_or_default()
        );
    }

    let credential = state.credentials.get().await?;

    let submitted = state
        .scheduler
        .submit(&translation.slurm_user, &credential, &translation.descriptor)
        .await
        .inspect_err(|e| {
            if e.is_timeout() {
                error!("Job submission timed out: {}", e);
            } else {
                error!("Error submitting job: {}", e);
            }
        })?;

    info!("Successfully requested job {:?}", submitted.job_id);

    Ok(submitted)
}
