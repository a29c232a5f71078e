//! Backend traits for the systems the built-in providers wrap.
//!
//! These are the external collaborators: vector search over the knowledge
//! graph, the design documentation index, and an MCP tool runtime. Unlike
//! [`Provider`](super::Provider), they report failures; the adapters in
//! [`crate::providers`] absorb them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BraidResult;

use super::provider::ProviderFilters;

/// Kind of knowledge-graph record a hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Entity,
    Relation,
    Topic,
}

/// A scored knowledge-graph record backing a rendered context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraphHit {
    /// Record id.
    pub id: String,
    /// Record kind.
    pub kind: HitKind,
    /// Entity name, relation type, or topic title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Similarity in `[0, 1]`; missing or non-numeric values count as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Rendered markdown context plus the hits it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraphContext {
    /// Markdown with `## ` section headers.
    pub context: String,
    /// Hits, in backend order.
    #[serde(default)]
    pub hits: Vec<KnowledgeGraphHit>,
}

/// Vector search over the knowledge graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeGraphSearcher: Send + Sync {
    /// Search and render a markdown context no larger than `max_tokens`.
    async fn search_with_context(
        &self,
        query: &str,
        limit: usize,
        filters: &ProviderFilters,
        max_tokens: usize,
    ) -> BraidResult<KnowledgeGraphContext>;
}

/// Vector search over system design documentation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DesignDocSearcher: Send + Sync {
    /// Search and render a markdown context no larger than `max_tokens`.
    async fn context(
        &self,
        query: &str,
        limit: usize,
        max_tokens: usize,
        filters: &ProviderFilters,
    ) -> BraidResult<String>;
}

/// A tool invocation sent to an MCP runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Tool name.
    pub tool: String,
    /// Tool arguments.
    pub arguments: serde_json::Value,
    /// Caller context forwarded alongside the arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

/// Outcome of a tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client for an MCP tool runtime.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Whether the runtime is reachable right now.
    async fn is_connected(&self) -> bool;

    /// Run one tool.
    async fn execute(&self, request: ToolRequest) -> BraidResult<ToolResult>;
}
