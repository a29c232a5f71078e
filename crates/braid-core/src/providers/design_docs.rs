//! Design documentation provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::traits::{DesignDocSearcher, OrchestrationFilters, Provider, ProviderFilters};
use crate::types::{InformationItem, InformationSource, ItemMetadata};

use super::sections::split_sections;

/// Token budget requested from the backend for its rendered context.
pub const DEFAULT_CONTEXT_TOKENS: usize = 1500;

/// Fixed score for every design documentation section.
pub const SECTION_SCORE: f32 = 0.7;

/// Adapts a [`DesignDocSearcher`] into a [`Provider`].
///
/// Only applies to requests that opt in with `include_design_docs`.
pub struct DesignDocsProvider {
    searcher: Arc<dyn DesignDocSearcher>,
    context_tokens: usize,
}

impl DesignDocsProvider {
    pub fn new(searcher: Arc<dyn DesignDocSearcher>) -> Self {
        Self {
            searcher,
            context_tokens: DEFAULT_CONTEXT_TOKENS,
        }
    }

    pub fn with_context_tokens(mut self, tokens: usize) -> Self {
        self.context_tokens = tokens;
        self
    }
}

#[async_trait]
impl Provider for DesignDocsProvider {
    fn name(&self) -> &str {
        "designDocs"
    }

    fn source(&self) -> InformationSource {
        InformationSource::DesignDocs
    }

    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        filters: &ProviderFilters,
    ) -> Vec<InformationItem> {
        let context = match self
            .searcher
            .context(query, limit, self.context_tokens, filters)
            .await
        {
            Ok(context) => context,
            Err(e) => {
                warn!(provider = self.name(), error = %e, "design doc search failed");
                return Vec::new();
            }
        };

        split_sections(&context)
            .into_iter()
            .enumerate()
            .map(|(idx, section)| {
                InformationItem::new(
                    format!("{}-{}", InformationSource::DesignDocs.id_prefix(), idx),
                    InformationSource::DesignDocs,
                    section.render(),
                    SECTION_SCORE,
                )
                .with_metadata(ItemMetadata::titled(section.title, "designDoc"))
            })
            .collect()
    }

    fn is_applicable(&self, filters: &OrchestrationFilters) -> bool {
        filters.include_design_docs
    }

    fn scope_filters(&self, filters: &OrchestrationFilters) -> ProviderFilters {
        ProviderFilters {
            section_id: filters.design_doc_section_id.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BraidError;
    use crate::traits::MockDesignDocSearcher;

    #[test]
    fn applies_only_when_requested() {
        let provider = DesignDocsProvider::new(Arc::new(MockDesignDocSearcher::new()));

        assert!(!provider.is_applicable(&OrchestrationFilters::default()));

        let filters = OrchestrationFilters::default().with_design_docs(Some("arch".into()));
        assert!(provider.is_applicable(&filters));
        assert_eq!(
            provider.scope_filters(&filters).section_id.as_deref(),
            Some("arch")
        );
    }

    #[tokio::test]
    async fn sections_get_fixed_score() {
        let mut searcher = MockDesignDocSearcher::new();
        searcher
            .expect_context()
            .withf(|_, limit, max_tokens, _| *limit == 3 && *max_tokens == DEFAULT_CONTEXT_TOKENS)
            .returning(|_, _, _, _| {
                Ok("## Storage\nWe use Postgres.\n## Queues\nJobs go through Redis.".to_string())
            });

        let provider = DesignDocsProvider::new(Arc::new(searcher));
        let items = provider.fetch("storage", 3, &ProviderFilters::default()).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "dd-0");
        assert_eq!(items[1].id, "dd-1");
        assert_eq!(items[1].content, "## Queues\nJobs go through Redis.");
        assert!(items.iter().all(|i| (i.score - SECTION_SCORE).abs() < 1e-6));
        assert_eq!(
            items[0]
                .metadata
                .as_ref()
                .and_then(|m| m.item_type.as_deref()),
            Some("designDoc")
        );
    }

    #[tokio::test]
    async fn backend_failure_is_empty() {
        let mut searcher = MockDesignDocSearcher::new();
        searcher
            .expect_context()
            .returning(|_, _, _, _| Err(BraidError::backend("designDocs", "index offline")));

        let provider = DesignDocsProvider::new(Arc::new(searcher));
        assert!(provider
            .fetch("storage", 3, &ProviderFilters::default())
            .await
            .is_empty());
    }
}
