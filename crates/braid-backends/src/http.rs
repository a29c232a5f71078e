//! Shared JSON-over-HTTP plumbing for the backend clients.

use braid_core::error::{BraidError, BraidResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::HttpBackendConfig;

/// A reqwest client bound to one backend's base URL.
#[derive(Debug, Clone)]
pub(crate) struct JsonEndpoint {
    client: Client,
    base: Url,
    api_key: Option<String>,
    backend: &'static str,
}

impl JsonEndpoint {
    pub(crate) fn new(backend: &'static str, config: &HttpBackendConfig) -> BraidResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                BraidError::Configuration(format!("Failed to build {} HTTP client: {}", backend, e))
            })?;

        Ok(Self {
            client,
            base: config.base_url()?,
            api_key: config.api_key.clone(),
            backend,
        })
    }

    fn url(&self, path: &str) -> BraidResult<Url> {
        self.base
            .join(path)
            .map_err(|e| BraidError::Configuration(format!("Invalid {} path {:?}: {}", self.backend, path, e)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// POST `body` to `path` and decode the JSON answer.
    pub(crate) async fn post<B, R>(&self, path: &str, body: &B) -> BraidResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.authorize(self.client.post(self.url(path)?).json(body));
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BraidError::backend(
                self.backend,
                format!("HTTP {}: {}", status, error.trim()),
            ));
        }

        response.json().await.map_err(|e| {
            BraidError::invalid_response(self.backend, format!("Failed to parse response: {}", e))
        })
    }

    /// GET `path` and report whether it answered with a success status.
    pub(crate) async fn probe(&self, path: &str) -> bool {
        let Ok(url) = self.url(path) else {
            return false;
        };
        match self.authorize(self.client.get(url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(backend = self.backend, error = %e, "health probe failed");
                false
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> BraidError {
        if e.is_timeout() {
            BraidError::Timeout(format!("{} request timed out", self.backend))
        } else {
            BraidError::network(format!("Failed to call {} backend: {}", self.backend, e))
        }
    }
}
