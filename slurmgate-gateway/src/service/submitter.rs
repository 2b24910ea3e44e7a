//! Scheduler submission capability

use async_trait::async_trait;
use slurmgate_client::{ClientError, SlurmClient};
use slurmgate_core::domain::credential::Credential;
use slurmgate_core::domain::job::JobDescriptor;

/// Outcome of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub job_id: Option<u64>,
}

/// Service trait for handing a batch job to the scheduler
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submits `job` as `user`, authenticated with `credential`
    async fn submit(
        &self,
        user: &str,
        credential: &Credential,
        job: &JobDescriptor,
    ) -> Result<SubmittedJob, ClientError>;
}

#[async_trait]
impl JobSubmitter for SlurmClient {
    async fn submit(
        &self,
        user: &str,
        credential: &Credential,
        job: &JobDescriptor,
    ) -> Result<SubmittedJob, ClientError> {
        let response = self.submit_job(user, credential, job).await?;
        Ok(SubmittedJob {
            job_id: response.job_id,
        })
    }
}
