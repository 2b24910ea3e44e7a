//! Status DTOs
//!
//! Acknowledgements returned by the gateway.

use serde::{Deserialize, Serialize};

/// Generic success acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,

    /// Scheduler job id, when the scheduler reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u64>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK!".to_string(),
            job_id: None,
        }
    }

    pub fn with_job_id(mut self, job_id: Option<u64>) -> Self {
        self.job_id = job_id;
        self
    }
}
