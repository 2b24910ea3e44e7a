//! Repository domain model
//!
//! Maps a CI repository to the cluster account its runners execute as.

use serde::{Deserialize, Serialize};

/// Per-repository configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    /// Repository identity (e.g., "https://github.com/org/repo"), unique key
    #[serde(rename = "gitHubURL")]
    pub git_hub_url: String,

    /// Cluster user the batch job is submitted as
    pub slurm_user: String,
}

impl RepositoryConfig {
    pub fn new(git_hub_url: impl Into<String>, slurm_user: impl Into<String>) -> Self {
        Self {
            git_hub_url: git_hub_url.into(),
            slurm_user: slurm_user.into(),
        }
    }

    /// Returns true if this entry is keyed by the given repository identity
    pub fn matches(&self, git_hub_url: &str) -> bool {
        self.git_hub_url == git_hub_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_config_uses_wire_names() {
        let json = r#"{"gitHubURL": "https://github.com/org/r", "slurmUser": "ci"}"#;
        let repo: RepositoryConfig = serde_json::from_str(json).unwrap();

        assert_eq!(repo, RepositoryConfig::new("https://github.com/org/r", "ci"));
    }

    #[test]
    fn test_matches_is_exact() {
        let repo = RepositoryConfig::new("https://github.com/org/r", "ci");

        assert!(repo.matches("https://github.com/org/r"));
        assert!(!repo.matches("https://github.com/org/r/"));
        assert!(!repo.matches("https://github.com/org/R"));
    }
}
