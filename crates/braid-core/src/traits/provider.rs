//! Provider trait and request filters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SourceWeights;
use crate::types::{InformationItem, InformationSource};

/// Request-level filters passed to [`RagOrchestrator::orchestrate`].
///
/// [`RagOrchestrator::orchestrate`]: crate::orchestration::RagOrchestrator::orchestrate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationFilters {
    /// Restrict knowledge-graph results to one organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Query the design documentation provider at all.
    pub include_design_docs: bool,
    /// Restrict design documentation results to one section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_doc_section_id: Option<String>,
}

impl OrchestrationFilters {
    /// Filters scoped to an organization.
    pub fn for_organization(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: Some(organization_id.into()),
            ..Default::default()
        }
    }

    /// Enable the design documentation provider.
    pub fn with_design_docs(mut self, section_id: Option<String>) -> Self {
        self.include_design_docs = true;
        self.design_doc_section_id = section_id;
        self
    }
}

/// Provider-specific filters, derived from [`OrchestrationFilters`] by each provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_semantic_category: Option<String>,
}

/// One information source behind a uniform fetch contract.
///
/// `fetch` is infallible by signature: an implementation catches its own
/// backend failures and answers with an empty list. Providers that do not
/// apply to a request report so through [`Provider::is_applicable`] and are
/// never called.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name, used in logs and stats.
    fn name(&self) -> &str;

    /// Source family of every item this provider returns.
    fn source(&self) -> InformationSource;

    /// Retrieve up to `limit` items for `query`, with raw scores in `[0, 1]`.
    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        filters: &ProviderFilters,
    ) -> Vec<InformationItem>;

    /// Multiplier applied to this provider's raw scores.
    fn weight(&self, weights: &SourceWeights) -> f32 {
        weights.get(self.source())
    }

    /// Whether this provider should be queried for the given request.
    fn is_applicable(&self, _filters: &OrchestrationFilters) -> bool {
        true
    }

    /// Derive this provider's own filters from the request filters.
    fn scope_filters(&self, _filters: &OrchestrationFilters) -> ProviderFilters {
        ProviderFilters::default()
    }
}
