//! Server state management.

use std::sync::Arc;

use braid_backends::ProviderFactory;
use braid_core::config::OrchestrationConfig;
use braid_core::error::BraidResult;
use braid_core::orchestration::RagOrchestrator;

use crate::settings::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<RagOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: RagOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Build providers from the configured backends.
    pub fn from_config(config: &ServerConfig) -> BraidResult<Self> {
        let providers = ProviderFactory::create(&config.backends)?;
        let orchestrator = RagOrchestrator::new(config.orchestration.clone(), providers)?;
        Ok(Self::new(orchestrator))
    }

    pub fn orchestrator(&self) -> &RagOrchestrator {
        &self.orchestrator
    }

    /// An orchestrator over the same providers with `f` applied to the policy.
    pub fn orchestrator_with<F>(&self, f: F) -> BraidResult<RagOrchestrator>
    where
        F: FnOnce(&mut OrchestrationConfig),
    {
        let mut config = self.orchestrator.config().clone();
        f(&mut config);
        self.orchestrator.with_config(config)
    }
}
