//! MCP tool provider.
//!
//! Runs the `search_knowledge_graph` tool on a connected MCP runtime and splits
//! the markdown it returns the same way the knowledge-graph provider does.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::traits::{OrchestrationFilters, Provider, ProviderFilters, ToolExecutor, ToolRequest};
use crate::types::{clamp_score, InformationItem, InformationSource, ItemMetadata};

use super::sections::split_sections;

/// Tool invoked on the runtime.
pub const SEARCH_TOOL: &str = "search_knowledge_graph";

/// Score for sections no returned source can be matched to.
const FALLBACK_SCORE: f32 = 0.5;

/// Adapts a [`ToolExecutor`] into a [`Provider`].
pub struct McpProvider {
    executor: Arc<dyn ToolExecutor>,
}

impl McpProvider {
    pub fn new(executor: Arc<dyn ToolExecutor>) -> Self {
        Self { executor }
    }

    fn request(query: &str, limit: usize, filters: &ProviderFilters) -> ToolRequest {
        ToolRequest {
            tool: SEARCH_TOOL.to_string(),
            arguments: json!({
                "query": query,
                "limit": limit,
                "organizationId": filters.organization_id,
            }),
            context: Some(json!({
                "query": query,
                "organizationId": filters.organization_id,
            })),
        }
    }
}

/// `(name, score)` pairs from the tool's `sources` array.
fn named_sources(data: &Value) -> Vec<(&str, Option<f64>)> {
    data.get("sources")
        .and_then(Value::as_array)
        .map(|sources| {
            sources
                .iter()
                .filter_map(|s| {
                    let name = s.get("name").and_then(Value::as_str)?;
                    Some((name, s.get("score").and_then(Value::as_f64)))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Score of the first source named in `body`; zero or missing scores fall back.
fn section_score(body: &str, sources: &[(&str, Option<f64>)]) -> f32 {
    sources
        .iter()
        .find(|(name, _)| !name.is_empty() && body.contains(name))
        .and_then(|(_, score)| *score)
        .map(|score| score as f32)
        .filter(|score| *score > 0.0)
        .map(clamp_score)
        .unwrap_or(FALLBACK_SCORE)
}

fn items_from_data(data: &Value) -> Vec<InformationItem> {
    // An explicit empty result set means the context is only a "no results" notice.
    if data
        .get("results")
        .and_then(Value::as_array)
        .is_some_and(|results| results.is_empty())
    {
        return Vec::new();
    }

    let Some(context) = data.get("context").and_then(Value::as_str) else {
        return Vec::new();
    };
    let sources = named_sources(data);

    split_sections(context)
        .into_iter()
        .enumerate()
        .map(|(idx, section)| {
            let score = section_score(&section.body, &sources);
            let content = section.render();
            let mut metadata = ItemMetadata::titled(section.title, "knowledgeGraph");
            metadata
                .extra
                .insert("tool".to_string(), Value::String(SEARCH_TOOL.to_string()));

            InformationItem::new(
                format!("{}-{}", InformationSource::Mcp.id_prefix(), idx),
                InformationSource::Mcp,
                content,
                score,
            )
            .with_metadata(metadata)
        })
        .collect()
}

#[async_trait]
impl Provider for McpProvider {
    fn name(&self) -> &str {
        "mcp"
    }

    fn source(&self) -> InformationSource {
        InformationSource::Mcp
    }

    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        filters: &ProviderFilters,
    ) -> Vec<InformationItem> {
        if !self.executor.is_connected().await {
            info!("MCP runtime not connected, skipping");
            return Vec::new();
        }

        match self
            .executor
            .execute(Self::request(query, limit, filters))
            .await
        {
            Ok(result) if result.success => match result.data {
                Some(data) => items_from_data(&data),
                None => {
                    warn!(tool = SEARCH_TOOL, "MCP tool returned no data");
                    Vec::new()
                }
            },
            Ok(result) => {
                warn!(
                    tool = SEARCH_TOOL,
                    error = result.error.as_deref().unwrap_or("unknown error"),
                    "MCP tool reported failure"
                );
                Vec::new()
            }
            Err(e) => {
                warn!(tool = SEARCH_TOOL, error = %e, "MCP tool call failed");
                Vec::new()
            }
        }
    }

    fn scope_filters(&self, filters: &OrchestrationFilters) -> ProviderFilters {
        ProviderFilters {
            organization_id: filters.organization_id.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BraidError;
    use crate::traits::{MockToolExecutor, ToolResult};

    fn connected(result: ToolResult) -> MockToolExecutor {
        let mut executor = MockToolExecutor::new();
        executor.expect_is_connected().returning(|| true);
        executor
            .expect_execute()
            .times(1)
            .returning(move |_| Ok(result.clone()));
        executor
    }

    #[tokio::test]
    async fn disconnected_runtime_is_never_called() {
        let mut executor = MockToolExecutor::new();
        executor.expect_is_connected().returning(|| false);
        executor.expect_execute().never();

        let provider = McpProvider::new(Arc::new(executor));
        assert!(provider
            .fetch("q", 5, &ProviderFilters::default())
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn request_carries_query_limit_and_organization() {
        let mut executor = MockToolExecutor::new();
        executor.expect_is_connected().returning(|| true);
        executor
            .expect_execute()
            .withf(|request| {
                request.tool == SEARCH_TOOL
                    && request.arguments["query"] == "billing"
                    && request.arguments["limit"] == 4
                    && request.arguments["organizationId"] == "org-9"
            })
            .times(1)
            .returning(|_| Ok(ToolResult::default()));

        let provider = McpProvider::new(Arc::new(executor));
        let filters = provider.scope_filters(&OrchestrationFilters::for_organization("org-9"));
        assert!(provider.fetch("billing", 4, &filters).await.is_empty());
    }

    #[tokio::test]
    async fn sections_scored_from_sources() {
        let executor = connected(ToolResult {
            success: true,
            data: Some(json!({
                "context": "## Entities\n- Stripe\n## Topics\n- Invoicing",
                "sources": [
                    {"type": "entity", "name": "Stripe", "score": 0.83},
                    {"type": "topic", "name": "Invoicing", "score": 0}
                ]
            })),
            error: None,
        });

        let provider = McpProvider::new(Arc::new(executor));
        let items = provider.fetch("billing", 5, &ProviderFilters::default()).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "mcp-0");
        assert!((items[0].score - 0.83).abs() < 1e-6);
        // Zero score falls back.
        assert!((items[1].score - 0.5).abs() < 1e-6);
        assert!(items.iter().all(|i| i.source == InformationSource::Mcp));
    }

    #[tokio::test]
    async fn failures_become_empty() {
        let failed = connected(ToolResult {
            success: false,
            data: None,
            error: Some("boom".into()),
        });
        let provider = McpProvider::new(Arc::new(failed));
        assert!(provider
            .fetch("q", 5, &ProviderFilters::default())
            .await
            .is_empty());

        let no_data = connected(ToolResult {
            success: true,
            data: None,
            error: None,
        });
        let provider = McpProvider::new(Arc::new(no_data));
        assert!(provider
            .fetch("q", 5, &ProviderFilters::default())
            .await
            .is_empty());

        let mut erroring = MockToolExecutor::new();
        erroring.expect_is_connected().returning(|| true);
        erroring
            .expect_execute()
            .returning(|_| Err(BraidError::tool("transport closed")));
        let provider = McpProvider::new(Arc::new(erroring));
        assert!(provider
            .fetch("q", 5, &ProviderFilters::default())
            .await
            .is_empty());
    }

    #[test]
    fn sources_named_only_in_titles_fall_back() {
        let data = json!({
            "context": "## Stripe\n- payment processor",
            "sources": [{"type": "entity", "name": "Stripe", "score": 0.95}]
        });
        let items = items_from_data(&data);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "## Stripe\n- payment processor");
        assert!((items[0].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_results_skip_the_notice() {
        let data = json!({
            "context": "No relevant knowledge graph information found for query: \"x\"",
            "results": [],
            "sources": []
        });
        assert!(items_from_data(&data).is_empty());
    }
}
