use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::{config::AppConfig, modules::verify::VerificationClient, web::SessionStore};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    sessions: SessionStore,
    verifier: VerificationClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let verifier = VerificationClient::new(&config.verify_api_url, config.verify_timeout)
            .context("failed to initialize verification client")?;
        info!(endpoint = %verifier.endpoint(), "verification client ready");

        Ok(Self {
            config: Arc::new(config),
            sessions: SessionStore::default(),
            verifier,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn verifier(&self) -> &VerificationClient {
        &self.verifier
    }
}
