//! Backend endpoint configuration.

use std::time::Duration;

use braid_core::error::{BraidError, BraidResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default request timeout for backend calls, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

/// One HTTP backend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    /// Base URL; request paths are resolved under it.
    pub url: String,
    /// Sent as a bearer token when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl HttpBackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse and normalize the base URL so relative paths resolve under it.
    pub fn base_url(&self) -> BraidResult<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| BraidError::Configuration(format!("Invalid backend URL {:?}: {}", self.url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(BraidError::Configuration(format!(
                "Backend URL {:?} must use http or https",
                self.url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn validate(&self) -> BraidResult<()> {
        self.base_url()?;
        if self.timeout_ms == 0 {
            return Err(BraidError::out_of_range(
                "timeout_ms",
                self.timeout_ms,
                "greater than 0",
            ));
        }
        Ok(())
    }
}

/// Endpoints for every backend. Missing entries disable that provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_graph: Option<HttpBackendConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_docs: Option<HttpBackendConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp: Option<HttpBackendConfig>,
}

impl BackendsConfig {
    pub fn validate(&self) -> BraidResult<()> {
        for backend in [&self.knowledge_graph, &self.design_docs, &self.mcp]
            .into_iter()
            .flatten()
        {
            backend.validate()?;
        }
        Ok(())
    }

    /// Whether no backend is configured.
    pub fn is_empty(&self) -> bool {
        self.knowledge_graph.is_none() && self.design_docs.is_none() && self.mcp.is_none()
    }

    /// Read `BRAID_{KG,DESIGN_DOCS,MCP}_{URL,API_KEY,TIMEOUT_MS}`.
    pub fn from_env() -> BraidResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> BraidResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            knowledge_graph: endpoint_from(&lookup, "BRAID_KG")?,
            design_docs: endpoint_from(&lookup, "BRAID_DESIGN_DOCS")?,
            mcp: endpoint_from(&lookup, "BRAID_MCP")?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn endpoint_from<F>(lookup: &F, prefix: &str) -> BraidResult<Option<HttpBackendConfig>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(url) = lookup(&format!("{prefix}_URL")).filter(|u| !u.trim().is_empty()) else {
        return Ok(None);
    };

    let mut endpoint = HttpBackendConfig::new(url.trim());
    endpoint.api_key = lookup(&format!("{prefix}_API_KEY")).filter(|k| !k.is_empty());
    if let Some(raw) = lookup(&format!("{prefix}_TIMEOUT_MS")) {
        endpoint.timeout_ms = raw.trim().parse().map_err(|_| {
            BraidError::Configuration(format!("{prefix}_TIMEOUT_MS has an invalid value: {raw:?}"))
        })?;
    }
    Ok(Some(endpoint))
}
