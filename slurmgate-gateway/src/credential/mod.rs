//! Credential cache
//!
//! Shares one scheduler credential between all in-flight requests and makes
//! sure concurrent callers that find it stale wait on a single renewal.
//!
//! A renewal records its refresh deadline before the mint starts, so a burst
//! of requests during the mint joins it instead of starting more mints. A
//! failed mint clears the slot again; the next `get()` retries, and repeated
//! failures are throttled with a capped exponential backoff.
//!
//! The refresh deadline never outlives the expiry recorded on the credential,
//! whatever lease the cache was configured with.

pub mod minter;

pub use minter::{MintError, ScontrolMinter, TokenMinter};

use chrono::Utc;
use slurmgate_core::domain::credential::Credential;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// How long a credential is handed out before it is renewed
pub const DEFAULT_LEASE: Duration = Duration::from_secs(10 * 60);

/// Upper bound for a single mint
pub const DEFAULT_MINT_TIMEOUT: Duration = Duration::from_secs(15);

const BACKOFF_INITIAL: Duration = Duration::from_millis(500);
const BACKOFF_MAX: Duration = Duration::from_secs(30);

/// Errors returned by [`CredentialCache::get`]
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Scheduler credential unavailable: {0}")]
    Unavailable(#[from] MintError),

    #[error("Scheduler credential renewal backing off for another {0:?}")]
    BackingOff(Duration),
}

type Renewal = Arc<OnceCell<Result<Credential, CredentialError>>>;

/// The current (or in-flight) credential and when it must be renewed
struct Slot {
    generation: u64,
    refresh_at: Instant,
    renewal: Renewal,
}

#[derive(Default)]
struct CacheState {
    slot: Option<Slot>,
    next_generation: u64,
    consecutive_failures: u32,
    retry_not_before: Option<Instant>,
}

/// Process-wide, time-bounded cache of the scheduler credential
pub struct CredentialCache {
    minter: Arc<dyn TokenMinter>,
    lease: Duration,
    mint_timeout: Duration,
    state: Mutex<CacheState>,
}

impl CredentialCache {
    /// Creates an empty cache; the first `get()` mints
    pub fn new(minter: Arc<dyn TokenMinter>) -> Self {
        Self {
            minter,
            lease: DEFAULT_LEASE,
            mint_timeout: DEFAULT_MINT_TIMEOUT,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn with_mint_timeout(mut self, timeout: Duration) -> Self {
        self.mint_timeout = timeout;
        self
    }

    /// Returns a valid credential, renewing it first if stale or absent
    ///
    /// Callers arriving while a renewal is in flight await that renewal and
    /// all observe its outcome, success or failure.
    pub async fn get(&self) -> Result<Credential, CredentialError> {
        let (generation, renewal) = self.current_or_renew()?;

        renewal
            .get_or_init(|| async {
                let outcome = self.mint().await;
                self.settle(generation, &outcome);
                outcome
            })
            .await
            .clone()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Picks the live slot, or installs a new renewal if there is none
    fn current_or_renew(&self) -> Result<(u64, Renewal), CredentialError> {
        let now = Instant::now();
        let mut state = self.lock();

        if let Some(slot) = &state.slot {
            let expired = matches!(
                slot.renewal.get(),
                Some(Ok(credential)) if credential.expires_at() <= Utc::now()
            );
            if now < slot.refresh_at && !expired {
                return Ok((slot.generation, Arc::clone(&slot.renewal)));
            }
        }

        if let Some(not_before) = state.retry_not_before {
            if now < not_before {
                return Err(CredentialError::BackingOff(not_before - now));
            }
        }

        info!("Scheduler credential expired or absent, renewing");

        let generation = state.next_generation;
        state.next_generation += 1;

        let renewal: Renewal = Arc::new(OnceCell::new());
        state.slot = Some(Slot {
            generation,
            refresh_at: now + self.lease,
            renewal: Arc::clone(&renewal),
        });

        Ok((generation, renewal))
    }

    async fn mint(&self) -> Result<Credential, CredentialError> {
        match tokio::time::timeout(self.mint_timeout, self.minter.mint()).await {
            Ok(Ok(credential)) if credential.expires_at() <= Utc::now() => {
                error!(
                    "Scheduler credential renewal returned a token that expired at {}",
                    credential.expires_at()
                );
                Err(MintError::AlreadyExpired(credential.expires_at()).into())
            }
            Ok(Ok(credential)) => {
                info!(
                    "Scheduler credential renewed, valid until {}",
                    credential.expires_at()
                );
                Ok(credential)
            }
            Ok(Err(err)) => {
                error!("Scheduler credential renewal failed: {}", err);
                Err(err.into())
            }
            Err(_) => {
                error!(
                    "Scheduler credential renewal timed out after {:?}",
                    self.mint_timeout
                );
                Err(MintError::TimedOut(self.mint_timeout).into())
            }
        }
    }

    /// Records a finished renewal; runs once per generation
    fn settle(&self, generation: u64, outcome: &Result<Credential, CredentialError>) {
        let mut state = self.lock();

        match outcome {
            Ok(credential) => {
                if let Some(slot) = state.slot.as_mut().filter(|s| s.generation == generation) {
                    slot.refresh_at = slot.refresh_at.min(Instant::now() + remaining(credential));
                }

                state.consecutive_failures = 0;
                state.retry_not_before = None;
            }
            Err(_) => {
                if state.slot.as_ref().is_some_and(|s| s.generation == generation) {
                    state.slot = None;
                }

                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                if let Some(delay) = backoff_delay(state.consecutive_failures) {
                    warn!(
                        "Scheduler credential renewal failed {} times in a row, pausing renewals for {:?}",
                        state.consecutive_failures, delay
                    );
                    state.retry_not_before = Some(Instant::now() + delay);
                }
            }
        }
    }
}

/// Wall-clock validity left on `credential`, zero once expired
fn remaining(credential: &Credential) -> Duration {
    (credential.expires_at() - Utc::now())
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Delay before the next renewal after `failures` consecutive failures
///
/// The first failure is retried straight away.
fn backoff_delay(failures: u32) -> Option<Duration> {
    if failures < 2 {
        return None;
    }

    let exponent = (failures - 2).min(16);
    Some(BACKOFF_INITIAL.saturating_mul(1 << exponent).min(BACKOFF_MAX))
}
