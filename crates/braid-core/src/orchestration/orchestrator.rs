//! The retrieval fusion orchestrator.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::OrchestrationConfig;
use crate::error::BraidResult;
use crate::traits::{OrchestrationFilters, Provider, ProviderFilters};
use crate::types::{InformationItem, RankedItem};

use super::assembly::build_context;
use super::budget::select_within_budget;
use super::dedup::deduplicate;
use super::ranking::{diversify, filter_relevant, rank};

/// Per-stage counts for one orchestration call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationStats {
    /// Providers actually queried.
    pub providers_queried: usize,
    /// Providers skipped as not applicable.
    pub skipped: Vec<String>,
    /// Providers that exceeded the per-provider timeout.
    pub timed_out: Vec<String>,
    /// Providers whose fetch panicked.
    pub failed: Vec<String>,
    /// Items returned across all providers.
    pub fetched: usize,
    /// Items left after deduplication.
    pub deduplicated: usize,
    /// Items at or above the relevance floor.
    pub relevant: usize,
    /// Items in the final context.
    pub selected: usize,
    /// Whether the last selected item was cut to fit.
    pub truncated: bool,
    /// Estimated tokens of the selected contents.
    pub estimated_tokens: usize,
    /// Selected items per source.
    pub per_source: BTreeMap<String, usize>,
}

/// Context plus the items and stats that produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationOutcome {
    pub context: String,
    /// Selected items, in selection order.
    pub items: Vec<RankedItem>,
    pub stats: OrchestrationStats,
}

enum FetchStatus {
    Completed,
    TimedOut,
    Panicked,
}

/// Fans a query out to every applicable provider and fuses the answers into
/// one token-budgeted context.
///
/// The provider registry is fixed at construction. [`RagOrchestrator::with_config`]
/// derives an orchestrator with a different policy over the same registry.
#[derive(Clone)]
pub struct RagOrchestrator {
    config: OrchestrationConfig,
    providers: Arc<[Arc<dyn Provider>]>,
}

impl std::fmt::Debug for RagOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagOrchestrator")
            .field("config", &self.config)
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl RagOrchestrator {
    /// Create an orchestrator. Rejects an invalid config.
    pub fn new(config: OrchestrationConfig, providers: Vec<Arc<dyn Provider>>) -> BraidResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            providers: providers.into(),
        })
    }

    /// Same providers, different policy.
    pub fn with_config(&self, config: OrchestrationConfig) -> BraidResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            providers: Arc::clone(&self.providers),
        })
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    /// Registered provider names, in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Build the context for `query`. An empty string means nothing relevant
    /// was found.
    ///
    /// `limit` caps each provider's own result count, not the merged set.
    pub async fn orchestrate(
        &self,
        query: &str,
        limit: usize,
        filters: &OrchestrationFilters,
    ) -> String {
        self.orchestrate_detailed(query, limit, filters).await.context
    }

    /// Like [`orchestrate`](Self::orchestrate), also returning the selected
    /// items and per-stage stats.
    pub async fn orchestrate_detailed(
        &self,
        query: &str,
        limit: usize,
        filters: &OrchestrationFilters,
    ) -> OrchestrationOutcome {
        let mut stats = OrchestrationStats::default();

        let (active, skipped): (Vec<_>, Vec<_>) = self
            .providers
            .iter()
            .partition(|provider| provider.is_applicable(filters));
        stats.skipped = skipped.iter().map(|p| p.name().to_string()).collect();
        stats.providers_queried = active.len();

        info!(
            providers = active.len(),
            skipped = stats.skipped.len(),
            limit,
            "orchestrating retrieval"
        );
        debug!(query, "orchestration query");

        let timeout = self.config.provider_timeout();
        let fetches = active.into_iter().map(|provider| {
            let scoped = provider.scope_filters(filters);
            async move {
                let (items, status) =
                    fetch_guarded(Arc::as_ref(provider), query, limit, &scoped, timeout).await;
                (provider, items, status)
            }
        });

        let mut merged: Vec<RankedItem> = Vec::new();
        for (provider, items, status) in join_all(fetches).await {
            match status {
                FetchStatus::Completed => {}
                FetchStatus::TimedOut => stats.timed_out.push(provider.name().to_string()),
                FetchStatus::Panicked => stats.failed.push(provider.name().to_string()),
            }

            let weight = provider.weight(&self.config.source_weights);
            debug!(provider = provider.name(), count = items.len(), weight, "provider returned");
            // Blank content never renders.
            merged.extend(
                items
                    .into_iter()
                    .filter(|item| !item.content.trim().is_empty())
                    .map(|item| RankedItem::weighted(item, weight)),
            );
        }
        stats.fetched = merged.len();

        let mut candidates = deduplicate(merged);
        stats.deduplicated = candidates.len();

        rank(&mut candidates);
        let mut candidates = filter_relevant(candidates, self.config.min_relevance_score);
        stats.relevant = candidates.len();

        if self.config.enable_diversity_filter {
            candidates = diversify(candidates, self.config.diversity_threshold);
            debug!(remaining = candidates.len(), "diversity filter applied");
        }

        let selection = select_within_budget(candidates, self.config.max_tokens);
        stats.selected = selection.items.len();
        stats.estimated_tokens = selection.used_tokens;
        stats.truncated = selection.items.last().is_some_and(|item| item.truncated);
        for item in &selection.items {
            *stats.per_source.entry(item.source().to_string()).or_insert(0) += 1;
        }

        let context = build_context(&selection.items);

        info!(
            fetched = stats.fetched,
            deduplicated = stats.deduplicated,
            relevant = stats.relevant,
            selected = stats.selected,
            estimated_tokens = stats.estimated_tokens,
            "orchestration complete"
        );

        OrchestrationOutcome {
            context,
            items: selection.items,
            stats,
        }
    }
}

/// Run one provider fetch, absorbing timeouts and panics into an empty list.
async fn fetch_guarded(
    provider: &dyn Provider,
    query: &str,
    limit: usize,
    filters: &ProviderFilters,
    timeout: Option<Duration>,
) -> (Vec<InformationItem>, FetchStatus) {
    let fetch = AssertUnwindSafe(provider.fetch(query, limit, filters)).catch_unwind();

    let outcome = match timeout {
        Some(deadline) => match tokio::time::timeout(deadline, fetch).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_ms = deadline.as_millis() as u64,
                    "provider fetch timed out"
                );
                return (Vec::new(), FetchStatus::TimedOut);
            }
        },
        None => fetch.await,
    };

    match outcome {
        Ok(items) => (items, FetchStatus::Completed),
        Err(_) => {
            warn!(provider = provider.name(), "provider fetch panicked");
            (Vec::new(), FetchStatus::Panicked)
        }
    }
}

/// One-shot helper: build an orchestrator and run a single query.
///
/// Uses the default policy when `config` is `None`.
pub async fn orchestrated_context(
    providers: Vec<Arc<dyn Provider>>,
    query: &str,
    limit: usize,
    filters: &OrchestrationFilters,
    config: Option<OrchestrationConfig>,
) -> BraidResult<String> {
    let orchestrator = RagOrchestrator::new(config.unwrap_or_default(), providers)?;
    Ok(orchestrator.orchestrate(query, limit, filters).await)
}
