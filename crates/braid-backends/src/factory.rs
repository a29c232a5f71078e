//! Factory wiring configured backends into providers.

use std::sync::Arc;

use braid_core::error::BraidResult;
use braid_core::providers::{DesignDocsProvider, KnowledgeGraphProvider, McpProvider};
use braid_core::traits::Provider;
use tracing::info;

use crate::config::BackendsConfig;
use crate::design_docs::HttpDesignDocs;
use crate::knowledge_graph::HttpKnowledgeGraph;
use crate::tools::HttpToolRuntime;

/// Factory for building the provider registry.
pub struct ProviderFactory;

impl ProviderFactory {
    /// One provider per configured backend, in knowledge graph, design docs,
    /// MCP order. Unconfigured backends are left out.
    pub fn create(config: &BackendsConfig) -> BraidResult<Vec<Arc<dyn Provider>>> {
        config.validate()?;
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        if let Some(endpoint) = &config.knowledge_graph {
            let searcher = HttpKnowledgeGraph::new(endpoint)?;
            info!(url = %endpoint.url, "knowledge graph backend configured");
            providers.push(Arc::new(KnowledgeGraphProvider::new(Arc::new(searcher))));
        }

        if let Some(endpoint) = &config.design_docs {
            let searcher = HttpDesignDocs::new(endpoint)?;
            info!(url = %endpoint.url, "design docs backend configured");
            providers.push(Arc::new(DesignDocsProvider::new(Arc::new(searcher))));
        }

        if let Some(endpoint) = &config.mcp {
            let runtime = HttpToolRuntime::new(endpoint)?;
            info!(url = %endpoint.url, "MCP tool runtime configured");
            providers.push(Arc::new(McpProvider::new(Arc::new(runtime))));
        }

        Ok(providers)
    }
}
