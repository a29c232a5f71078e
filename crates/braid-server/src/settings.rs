//! Server settings: listen address plus the orchestration and backend config.

use std::path::{Path, PathBuf};

use braid_backends::BackendsConfig;
use braid_core::config::OrchestrationConfig;
use braid_core::error::{BraidError, BraidResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Contents of the server config file.
///
/// ```toml
/// [orchestration]
/// max_tokens = 4000
///
/// [backends.knowledge_graph]
/// url = "http://localhost:7001"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub orchestration: OrchestrationConfig,
    pub backends: BackendsConfig,
}

impl ServerConfig {
    /// Parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> BraidResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self =
            toml::from_str(&content).map_err(|e| BraidError::Configuration(e.to_string()))?;
        config.orchestration.validate()?;
        config.backends.validate()?;
        Ok(config)
    }

    /// Load from `BRAID_CONFIG` (or `~/.braid/config.toml`) when the file
    /// exists, otherwise from `BRAID_*` environment variables.
    pub fn load() -> BraidResult<Self> {
        let path = std::env::var("BRAID_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(default_config_path);

        match path {
            Some(path) if path.is_file() => {
                info!(path = %path.display(), "loading config file");
                Self::from_file(&path)
            }
            _ => Ok(Self {
                orchestration: OrchestrationConfig::from_env()?,
                backends: BackendsConfig::from_env()?,
            }),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".braid").join("config.toml"))
}
