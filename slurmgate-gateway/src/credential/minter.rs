//! Token minting
//!
//! The scheduler only accepts JWTs minted by a privileged local command. The
//! gateway reaches it through the [`TokenMinter`] capability so tests never
//! have to run the real thing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slurmgate_core::domain::credential::Credential;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Command that mints a scheduler token
const MINT_PROGRAM: &str = "sudo";
const MINT_ARGS: [&str; 2] = ["scontrol", "token"];

/// Length of the `SLURM_JWT=` prefix printed before the token
const TOKEN_PREFIX_LEN: usize = 10;

/// Errors raised by a mint attempt
#[derive(Debug, Clone, Error)]
pub enum MintError {
    #[error("Failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` printed no usable token")]
    MalformedOutput { command: String },

    #[error("Token mint timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Minted token already expired at {0}")]
    AlreadyExpired(DateTime<Utc>),
}

/// Capability that produces a fresh scheduler credential
#[async_trait]
pub trait TokenMinter: Send + Sync {
    /// Mints one credential; never retries internally
    async fn mint(&self) -> Result<Credential, MintError>;
}

/// Mints tokens with `sudo scontrol token`
pub struct ScontrolMinter {
    program: String,
    args: Vec<String>,
    lease: Duration,
}

impl ScontrolMinter {
    /// Creates a minter whose credentials are stamped valid for `lease`
    pub fn new(lease: Duration) -> Self {
        Self {
            program: MINT_PROGRAM.to_string(),
            args: MINT_ARGS.iter().map(|a| a.to_string()).collect(),
            lease,
        }
    }

    #[cfg(test)]
    fn with_command(program: &str, args: &[&str], lease: Duration) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            lease,
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl TokenMinter for ScontrolMinter {
    async fn mint(&self) -> Result<Credential, MintError> {
        let command = self.command_line();
        debug!("Running `{}`", command);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MintError::Spawn {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MintError::NonZeroExit {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let token = parse_token_output(&stdout).ok_or(MintError::MalformedOutput { command })?;

        info!("Minted scheduler token (valid for {:?})", self.lease);

        Ok(Credential::with_lease(token, self.lease))
    }
}

/// Extracts the token from the mint command's stdout
///
/// The output is `SLURM_JWT=<token>`: the first ten characters of the
/// trimmed text are dropped and the rest is trimmed again.
pub fn parse_token_output(stdout: &str) -> Option<String> {
    let rest: String = stdout.trim().chars().skip(TOKEN_PREFIX_LEN).collect();
    let token = rest.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
