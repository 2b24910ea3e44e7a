//! Slurmgate Scheduler Client
//!
//! A small, typed HTTP client for the Slurm REST daemon (slurmrestd).
//!
//! The gateway only ever submits batch jobs, so this crate covers exactly that
//! call: headers carrying the submitting user and the current JWT, the JSON
//! job body, and parsing of the scheduler's answer.
//!
//! # Example
//!
//! ```no_run
//! use slurmgate_client::SlurmClient;
//! use slurmgate_core::domain::credential::Credential;
//! use slurmgate_core::domain::job::JobDescriptor;
//! use std::time::Duration;
//!
//! # async fn example(job: JobDescriptor) -> anyhow::Result<()> {
//! let client = SlurmClient::new("http://127.0.0.1:6820", Duration::from_secs(30))?;
//! let credential = Credential::with_lease("jwt", Duration::from_secs(600));
//!
//! let submitted = client.submit_job("ci-user", &credential, &job).await?;
//! println!("Submitted job: {:?}", submitted.job_id);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::{SUBMIT_PATH, SchedulerMessage, SubmitResponse};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header carrying the cluster user a request acts as
pub const USER_NAME_HEADER: &str = "X-SLURM-USER-NAME";

/// Header carrying the scheduler JWT
pub const USER_TOKEN_HEADER: &str = "X-SLURM-USER-TOKEN";

/// HTTP client for the scheduler REST API
#[derive(Debug, Clone)]
pub struct SlurmClient {
    /// Base URL of slurmrestd (e.g., "http://127.0.0.1:6820")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl SlurmClient {
    /// Create a new scheduler client whose requests give up after `timeout`
    ///
    /// # Arguments
    /// * `base_url` - The base URL of slurmrestd
    /// * `timeout` - Upper bound for a whole request, connect to last body byte
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new scheduler client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the scheduler
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
