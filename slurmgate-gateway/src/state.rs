//! Shared application state

use std::sync::Arc;

use crate::config::ConfigStore;
use crate::credential::CredentialCache;
use crate::service::JobSubmitter;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub credentials: Arc<CredentialCache>,
    pub scheduler: Arc<dyn JobSubmitter>,
}

impl AppState {
    pub fn new(
        config: ConfigStore,
        credentials: CredentialCache,
        scheduler: Arc<dyn JobSubmitter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            scheduler,
        }
    }
}
