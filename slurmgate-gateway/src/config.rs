//! Gateway configuration
//!
//! The YAML document mapping repositories to cluster users, plus the job
//! script template and the shared secret guarding the HTTP API.
//!
//! The active document is held as an immutable snapshot. A reload parses and
//! validates the whole file first and only then swaps the snapshot, so a bad
//! file never replaces a good one.

use serde::Deserialize;
use slurmgate_core::domain::repository::RepositoryConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors raised while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid config - no GHA shared secret")]
    MissingSharedSecret,
}

/// On-disk shape of the config file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    repositories: Vec<RepositoryConfig>,
    job_template: String,
    #[serde(default)]
    logging: Option<String>,
    #[serde(default)]
    gha_shared_secret: Option<String>,
}

/// A validated configuration snapshot
#[derive(Clone)]
pub struct GatewayConfig {
    pub repositories: Vec<RepositoryConfig>,
    pub job_template: String,
    logging: Option<String>,
    shared_secret: String,
}

impl GatewayConfig {
    /// Parses and validates a YAML config document
    pub fn from_yaml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let shared_secret = file
            .gha_shared_secret
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSharedSecret)?;

        Ok(Self {
            repositories: file.repositories,
            job_template: file.job_template,
            logging: file.logging,
            shared_secret,
        })
    }

    /// Reads, parses and validates the config file at `path`
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_yaml(path, &contents)
    }

    /// Finds the entry for a repository identity
    pub fn repository(&self, git_hub_url: &str) -> Option<&RepositoryConfig> {
        self.repositories.iter().find(|r| r.matches(git_hub_url))
    }

    /// Whether request and job payloads should be dumped to the log
    pub fn verbose(&self) -> bool {
        self.logging.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// Exact-match check of a presented shared secret
    pub fn accepts_secret(&self, presented: &str) -> bool {
        presented == self.shared_secret
    }
}

// The shared secret stays out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("repositories", &self.repositories)
            .field("job_template", &self.job_template)
            .field("logging", &self.logging)
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}

/// Holder of the active configuration snapshot
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Arc<GatewayConfig>>,
}

impl ConfigStore {
    /// Loads the initial configuration; failure means the gateway must not start
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        tracing::info!("Loading config from {}", path.display());

        let config = GatewayConfig::load(&path).await?;

        tracing::info!(
            "Config loaded: {} repositories configured",
            config.repositories.len()
        );

        Ok(Self::with_config(path, config))
    }

    /// Wraps an already validated snapshot
    pub fn with_config(path: impl Into<PathBuf>, config: GatewayConfig) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Returns the active snapshot
    pub fn snapshot(&self) -> Arc<GatewayConfig> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Re-reads the config file and swaps it in if valid
    ///
    /// On error the previous snapshot stays active.
    pub async fn reload(&self) -> Result<Arc<GatewayConfig>, ConfigError> {
        tracing::info!("Reloading config from {}", self.path.display());

        let config = Arc::new(GatewayConfig::load(&self.path).await?);

        {
            let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
            *guard = Arc::clone(&config);
        }

        tracing::info!(
            "Config re-loaded: {} repositories configured",
            config.repositories.len()
        );

        Ok(config)
    }
}
