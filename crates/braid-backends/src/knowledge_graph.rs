//! HTTP client for a knowledge-graph search service.
//!
//! `POST {base}/search` with `{query, limit, max_tokens, filters}`, answered
//! by `{context, hits}`.

use async_trait::async_trait;
use braid_core::error::BraidResult;
use braid_core::traits::{KnowledgeGraphContext, KnowledgeGraphSearcher, ProviderFilters};
use serde::Serialize;
use tracing::debug;

use crate::config::HttpBackendConfig;
use crate::http::JsonEndpoint;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    max_tokens: usize,
    filters: &'a ProviderFilters,
}

/// Knowledge-graph search over HTTP.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeGraph {
    endpoint: JsonEndpoint,
}

impl HttpKnowledgeGraph {
    pub fn new(config: &HttpBackendConfig) -> BraidResult<Self> {
        Ok(Self {
            endpoint: JsonEndpoint::new("knowledgeGraph", config)?,
        })
    }
}

#[async_trait]
impl KnowledgeGraphSearcher for HttpKnowledgeGraph {
    async fn search_with_context(
        &self,
        query: &str,
        limit: usize,
        filters: &ProviderFilters,
        max_tokens: usize,
    ) -> BraidResult<KnowledgeGraphContext> {
        let request = SearchRequest {
            query,
            limit,
            max_tokens,
            filters,
        };
        let context: KnowledgeGraphContext = self.endpoint.post("search", &request).await?;
        debug!(hits = context.hits.len(), "knowledge graph search answered");
        Ok(context)
    }
}
