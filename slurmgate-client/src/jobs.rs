//! Job submission endpoint

use crate::error::{ClientError, Result};
use crate::{SlurmClient, USER_NAME_HEADER, USER_TOKEN_HEADER};
use serde::Deserialize;
use slurmgate_core::domain::credential::Credential;
use slurmgate_core::domain::job::JobDescriptor;

/// Path of the batch submission endpoint, relative to the base URL
pub const SUBMIT_PATH: &str = "/slurm/v0.0.36/job/submit";

/// Body returned by the scheduler for a submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    /// Id of the created job, if one was created
    #[serde(default)]
    pub job_id: Option<u64>,

    #[serde(default)]
    pub errors: Vec<SchedulerMessage>,

    #[serde(default)]
    pub warnings: Vec<SchedulerMessage>,
}

/// An error or warning entry reported by the scheduler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerMessage {
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub errno: Option<i64>,
}

impl std::fmt::Display for SchedulerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self
            .error
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("unknown error");
        match self.errno {
            Some(errno) => write!(f, "{} (errno {})", text, errno),
            None => write!(f, "{}", text),
        }
    }
}

impl SlurmClient {
    /// Submit a batch job as `user`
    ///
    /// This is a single best-effort call: it is never retried here.
    ///
    /// # Arguments
    /// * `user` - Cluster user the job runs as
    /// * `credential` - Current scheduler JWT
    /// * `job` - Rendered job descriptor
    ///
    /// # Returns
    /// The scheduler's answer, with `errors` guaranteed empty
    pub async fn submit_job(
        &self,
        user: &str,
        credential: &Credential,
        job: &JobDescriptor,
    ) -> Result<SubmitResponse> {
        let url = format!("{}{}", self.base_url, SUBMIT_PATH);

        tracing::debug!("Submitting job for user {} to {}", user, url);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(USER_NAME_HEADER, user)
            .header(USER_TOKEN_HEADER, credential.token())
            .json(job)
            .send()
            .await?;

        let submitted: SubmitResponse = self.handle_response(response).await?;

        for warning in &submitted.warnings {
            tracing::warn!("Scheduler warning for user {}: {}", user, warning);
        }

        if !submitted.errors.is_empty() {
            let messages: Vec<String> = submitted.errors.iter().map(|e| e.to_string()).collect();
            return Err(ClientError::Rejected(messages.join("; ")));
        }

        tracing::info!("Job submitted for user {}: {:?}", user, submitted.job_id);

        Ok(submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use slurmgate_core::domain::job::{JobProperties, Partition};
    use std::time::Duration;

    fn descriptor() -> JobDescriptor {
        JobDescriptor {
            script: "#!/bin/bash\necho hi\n".to_string(),
            job: JobProperties {
                comment: "GitHub Actions Builder for https://github.com/org/r".to_string(),
                name: "GitHubActions".to_string(),
                ntasks: 1,
                partition: Partition::Default.name().to_string(),
                cpus_per_task: Some("4".to_string()),
                exclusive: None,
                memory_per_node: None,
                standard_output: "/tmp/gha-stdout".to_string(),
                standard_error: "/tmp/gha-stderr".to_string(),
                current_working_directory: "/tmp".to_string(),
            },
        }
    }

    fn credential() -> Credential {
        Credential::with_lease("jwt-value", Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_submit_job_sends_identity_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SUBMIT_PATH)
            .match_header(USER_NAME_HEADER, "ci-user")
            .match_header(USER_TOKEN_HEADER, "jwt-value")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "script": "#!/bin/bash\necho hi\n",
                "job": {"partition": "gha", "ntasks": 1, "cpus_per_task": "4"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"job_id": 42, "step_id": "batch", "errors": [], "warnings": []}"#)
            .expect(1)
            .create_async()
            .await;

        let client = SlurmClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let submitted = client
            .submit_job("ci-user", &credential(), &descriptor())
            .await
            .unwrap();

        assert_eq!(submitted.job_id, Some(42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_job_maps_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SUBMIT_PATH)
            .with_status(500)
            .with_body("slurmctld unavailable")
            .expect(1)
            .create_async()
            .await;

        let client = SlurmClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = client
            .submit_job("ci-user", &credential(), &descriptor())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 500, .. }));
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("slurmctld unavailable"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_job_times_out_on_silent_scheduler() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let client = SlurmClient::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let err = client
            .submit_job("ci-user", &credential(), &descriptor())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_submit_job_reports_scheduler_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors": [{"error": "Invalid partition name specified", "errno": 2000}]}"#)
            .create_async()
            .await;

        let client = SlurmClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = client
            .submit_job("ci-user", &credential(), &descriptor())
            .await
            .unwrap_err();

        match err {
            ClientError::Rejected(msg) => {
                assert!(msg.contains("Invalid partition name specified"));
                assert!(msg.contains("2000"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_job_rejects_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = SlurmClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = client
            .submit_job("ci-user", &credential(), &descriptor())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[test]
    fn test_scheduler_message_display() {
        let message = SchedulerMessage {
            error: Some("Access denied".to_string()),
            description: None,
            errno: Some(1),
        };
        assert_eq!(message.to_string(), "Access denied (errno 1)");

        assert_eq!(SchedulerMessage::default().to_string(), "unknown error");
    }
}
