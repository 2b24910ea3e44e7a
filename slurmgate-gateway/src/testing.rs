//! Test doubles for the gateway's external capabilities

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use slurmgate_client::ClientError;
use slurmgate_core::domain::credential::Credential;
use slurmgate_core::domain::job::JobDescriptor;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::ConfigStore;
use crate::config::tests::sample_config;
use crate::credential::{CredentialCache, MintError, TokenMinter};
use crate::service::{JobSubmitter, SubmittedJob};
use crate::state::AppState;
use crate::DEFAULT_LOG_FILTER;

/// Minter returning `jwt-<n>` for the n-th call, optionally failing first
pub struct FakeMinter {
    calls: AtomicUsize,
    failures: AtomicUsize,
    delay: Duration,
    validity: TimeDelta,
}

impl FakeMinter {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            delay: Duration::ZERO,
            validity: TimeDelta::minutes(10),
        }
    }

    /// Sets how long minted credentials stay valid; negative mints expired ones
    pub fn with_validity(mut self, validity: TimeDelta) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_next(self, count: usize) -> Self {
        self.set_failures(count);
        self
    }

    pub fn set_failures(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenMinter for FakeMinter {
    async fn mint(&self) -> Result<Credential, MintError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| f.checked_sub(1))
            .is_ok();
        if failing {
            return Err(MintError::NonZeroExit {
                command: "fake mint".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "denied".to_string(),
            });
        }

        Ok(Credential::new(format!("jwt-{n}"), Utc::now() + self.validity))
    }
}

/// A submission seen by [`RecordingSubmitter`]
#[derive(Debug, Clone)]
pub struct Submission {
    pub user: String,
    pub token: String,
    pub job: JobDescriptor,
}

/// Submitter that records every call and answers with a fixed outcome
pub struct RecordingSubmitter {
    submissions: Mutex<Vec<Submission>>,
    fail: bool,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        user: &str,
        credential: &Credential,
        job: &JobDescriptor,
    ) -> Result<SubmittedJob, ClientError> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(Submission {
            user: user.to_string(),
            token: credential.token().to_string(),
            job: job.clone(),
        });

        if self.fail {
            return Err(ClientError::api_error(500, "slurmctld unavailable"));
        }

        Ok(SubmittedJob {
            job_id: Some(submissions.len() as u64),
        })
    }
}

/// Application state over the sample config and the given fakes
pub fn app_state(minter: Arc<FakeMinter>, submitter: Arc<RecordingSubmitter>) -> AppState {
    AppState::new(
        ConfigStore::with_config("config.yaml", sample_config()),
        CredentialCache::new(minter),
        submitter,
    )
}

/// Log sink for asserting on what a subscriber with the default filter prints
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
