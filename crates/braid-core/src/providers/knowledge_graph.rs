//! Knowledge-graph provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::traits::{
    KnowledgeGraphContext, KnowledgeGraphHit, KnowledgeGraphSearcher, OrchestrationFilters,
    Provider, ProviderFilters,
};
use crate::types::{clamp_score, InformationItem, InformationSource, ItemMetadata};

use super::sections::split_sections;

/// Token budget requested from the backend for its rendered context.
pub const DEFAULT_CONTEXT_TOKENS: usize = 2000;

/// Score given to a section no hit can be matched to.
const BASELINE_SCORE: f32 = 0.5;

/// Adapts a [`KnowledgeGraphSearcher`] into a [`Provider`].
pub struct KnowledgeGraphProvider {
    searcher: Arc<dyn KnowledgeGraphSearcher>,
    context_tokens: usize,
}

impl KnowledgeGraphProvider {
    /// Create a provider over `searcher`.
    pub fn new(searcher: Arc<dyn KnowledgeGraphSearcher>) -> Self {
        Self {
            searcher,
            context_tokens: DEFAULT_CONTEXT_TOKENS,
        }
    }

    /// Override the context budget passed to the backend.
    pub fn with_context_tokens(mut self, tokens: usize) -> Self {
        self.context_tokens = tokens;
        self
    }

    fn items_from_context(result: &KnowledgeGraphContext) -> Vec<InformationItem> {
        split_sections(&result.context)
            .into_iter()
            .enumerate()
            .map(|(idx, section)| {
                let score = section_score(&section.body, &result.hits);
                let content = section.render();
                InformationItem::new(
                    format!("{}-{}", InformationSource::KnowledgeGraph.id_prefix(), idx),
                    InformationSource::KnowledgeGraph,
                    content,
                    score,
                )
                .with_metadata(ItemMetadata::titled(section.title, "knowledgeGraph"))
            })
            .collect()
    }
}

/// Baseline score, raised to the score of the first hit named in `body`.
fn section_score(body: &str, hits: &[KnowledgeGraphHit]) -> f32 {
    let matched = hits.iter().find(|hit| {
        hit.name
            .as_deref()
            .is_some_and(|name| !name.is_empty() && body.contains(name))
    });

    match matched {
        Some(hit) => BASELINE_SCORE.max(clamp_score(hit.score.unwrap_or(0.0))),
        None => BASELINE_SCORE,
    }
}

#[async_trait]
impl Provider for KnowledgeGraphProvider {
    fn name(&self) -> &str {
        "knowledgeGraph"
    }

    fn source(&self) -> InformationSource {
        InformationSource::KnowledgeGraph
    }

    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        filters: &ProviderFilters,
    ) -> Vec<InformationItem> {
        match self
            .searcher
            .search_with_context(query, limit, filters, self.context_tokens)
            .await
        {
            Ok(result) => {
                let items = Self::items_from_context(&result);
                debug!(hits = result.hits.len(), items = items.len(), "knowledge graph context split");
                items
            }
            Err(e) => {
                warn!(provider = self.name(), error = %e, "knowledge graph search failed");
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
    use crate::traits::{HitKind, MockKnowledgeGraphSearcher};

    fn hit(name: &str, score: f32) -> KnowledgeGraphHit {
        KnowledgeGraphHit {
            id: format!("id-{name}"),
            kind: HitKind::Entity,
            name: Some(name.to_string()),
            score: Some(score),
        }
    }

    #[test]
    fn section_score_uses_first_matching_hit() {
        let hits = vec![hit("Zed", 0.99), hit("Acme", 0.8), hit("Bob", 0.95)];
        // "Acme" matches before "Bob" in hit order.
        assert!((section_score("Bob works at Acme", &hits) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn section_score_never_drops_below_baseline() {
        let hits = vec![hit("Acme", 0.2)];
        assert!((section_score("Acme Corp", &hits) - 0.5).abs() < 1e-6);
        assert!((section_score("nothing here", &hits) - 0.5).abs() < 1e-6);

        let nameless = vec![KnowledgeGraphHit {
            id: "t1".into(),
            kind: HitKind::Topic,
            name: Some(String::new()),
            score: Some(0.9),
        }];
        assert!((section_score("anything", &nameless) - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn fetch_splits_sections_and_scores_them() {
        let mut searcher = MockKnowledgeGraphSearcher::new();
        searcher
            .expect_search_with_context()
            .withf(|query, limit, filters, max_tokens| {
                query.to_string() == "who works at acme"
                    && *limit == 5
                    && filters.organization_id.as_deref() == Some("org-1")
                    && *max_tokens == DEFAULT_CONTEXT_TOKENS
            })
            .times(1)
            .returning(|_, _, _, _| {
                Ok(KnowledgeGraphContext {
                    context: "## Entities\n- Acme\n## Relations\n- Bob -> Acme".to_string(),
                    hits: vec![hit("Bob", 0.9), hit("Acme", 0.7)],
                })
            });

        let provider = KnowledgeGraphProvider::new(Arc::new(searcher));
        let filters = provider.scope_filters(&OrchestrationFilters::for_organization("org-1"));
        let items = provider.fetch("who works at acme", 5, &filters).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "kg-0");
        assert_eq!(items[0].content, "## Entities\n- Acme");
        assert!((items[0].score - 0.7).abs() < 1e-6);
        assert_eq!(items[0].title(), Some("Entities"));
        assert_eq!(items[1].id, "kg-1");
        assert!((items[1].score - 0.9).abs() < 1e-6);
        assert!(items.iter().all(|i| i.source == InformationSource::KnowledgeGraph));
    }

    #[test]
    fn names_in_titles_do_not_score() {
        let result = KnowledgeGraphContext {
            context: "## Acme\n- founded in 1999".to_string(),
            hits: vec![hit("Acme", 0.9)],
        };
        let items = KnowledgeGraphProvider::items_from_context(&result);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "## Acme\n- founded in 1999");
        assert!((items[0].score - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn fetch_swallows_backend_errors() {
        let mut searcher = MockKnowledgeGraphSearcher::new();
        searcher
            .expect_search_with_context()
            .returning(|_, _, _, _| Err(BraidError::backend("knowledgeGraph", "unreachable")));

        let provider = KnowledgeGraphProvider::new(Arc::new(searcher));
        let items = provider
            .fetch("anything", 10, &ProviderFilters::default())
            .await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn blank_context_yields_nothing() {
        let mut searcher = MockKnowledgeGraphSearcher::new();
        searcher
            .expect_search_with_context()
            .returning(|_, _, _, _| Ok(KnowledgeGraphContext::default()));

        let provider = KnowledgeGraphProvider::new(Arc::new(searcher)).with_context_tokens(500);
        assert!(provider
            .fetch("q", 10, &ProviderFilters::default())
            .await
            .is_empty());
    }
}
