//! Slurmgate Gateway
//!
//! Accepts authenticated requests to launch ephemeral CI runners and submits
//! each one as a batch job to the Slurm REST API.
//!
//! Architecture:
//! - Config: YAML repository mapping, job template and shared secret; reloadable
//! - Credential: shared scheduler JWT with single-flight renewal
//! - Translator: launch request + repository entry -> batch job descriptor
//! - Service: translate, obtain credential, submit
//! - API: axum routes guarded by the shared secret

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod credential;
pub mod service;
pub mod state;
pub mod translator;

#[cfg(test)]
mod testing;

use crate::config::ConfigStore;
use crate::credential::{CredentialCache, DEFAULT_LEASE, ScontrolMinter};
use crate::state::AppState;
use slurmgate_client::SlurmClient;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "slurmgate_gateway=info,slurmgate_client=info,tower_http=debug";

#[derive(Parser)]
#[command(name = "slurmgate")]
#[command(about = "Launch ephemeral CI runners as Slurm batch jobs", long_about = None)]
struct Cli {
    /// Path of the YAML config file
    #[arg(long, env = "GHA_SLURM_JWT_CONFIG", default_value = "config.yaml")]
    config: String,

    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5011)]
    port: u16,

    /// Base URL of slurmrestd
    #[arg(long, env = "SLURMRESTD_URL", default_value = "http://127.0.0.1:6820")]
    slurm_url: String,

    /// Timeout for a job submission, in seconds
    #[arg(long, env = "SUBMIT_TIMEOUT_SECS", default_value_t = 30)]
    submit_timeout_secs: u64,

    /// Timeout for minting a scheduler token, in seconds
    #[arg(long, env = "MINT_TIMEOUT_SECS", default_value_t = 15)]
    mint_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Slurmgate Gateway...");

    // A gateway without a valid config must not serve traffic
    let config = ConfigStore::open(&cli.config)
        .await
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    let credentials = CredentialCache::new(Arc::new(ScontrolMinter::new(DEFAULT_LEASE)))
        .with_lease(DEFAULT_LEASE)
        .with_mint_timeout(Duration::from_secs(cli.mint_timeout_secs));

    let scheduler = SlurmClient::new(
        cli.slurm_url.clone(),
        Duration::from_secs(cli.submit_timeout_secs),
    )
    .context("Failed to build scheduler client")?;

    tracing::info!("Submitting jobs to {}", scheduler.base_url());

    let state = AppState::new(config, credentials, Arc::new(scheduler));

    // Build router with all API endpoints
    let app = api::create_router(state);

    let addr = format!("{}:{}", cli.bind, cli.port);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
