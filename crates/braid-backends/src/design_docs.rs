//! HTTP client for a design documentation index.
//!
//! `POST {base}/context` with `{query, limit, max_tokens, filters}`, answered
//! by `{context}`.

use async_trait::async_trait;
use braid_core::error::BraidResult;
use braid_core::traits::{DesignDocSearcher, ProviderFilters};
use serde::{Deserialize, Serialize};

use crate::config::HttpBackendConfig;
use crate::http::JsonEndpoint;

#[derive(Debug, Serialize)]
struct ContextRequest<'a> {
    query: &'a str,
    limit: usize,
    max_tokens: usize,
    filters: &'a ProviderFilters,
}

#[derive(Debug, Deserialize)]
struct ContextResponse {
    #[serde(default)]
    context: String,
}

/// Design documentation search over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDesignDocs {
    endpoint: JsonEndpoint,
}

impl HttpDesignDocs {
    pub fn new(config: &HttpBackendConfig) -> BraidResult<Self> {
        Ok(Self {
            endpoint: JsonEndpoint::new("designDocs", config)?,
        })
    }
}

#[async_trait]
impl DesignDocSearcher for HttpDesignDocs {
    async fn context(
        &self,
        query: &str,
        limit: usize,
        max_tokens: usize,
        filters: &ProviderFilters,
    ) -> BraidResult<String> {
        let request = ContextRequest {
            query,
            limit,
            max_tokens,
            filters,
        };
        let response: ContextResponse = self.endpoint.post("context", &request).await?;
        Ok(response.context)
    }
}
