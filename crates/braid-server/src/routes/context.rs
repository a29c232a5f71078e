//! Context assembly endpoint.

use axum::{extract::State, Json};
use braid_core::orchestration::OrchestrationStats;
use braid_core::traits::OrchestrationFilters;
use braid_core::types::RankedItem;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn default_limit() -> usize {
    10
}

/// Request body for building a context.
#[derive(Debug, Deserialize)]
pub struct ContextRequest {
    /// Free-text query.
    pub query: String,
    /// Per-provider result cap.
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub organization_id: Option<String>,
    #[serde(default)]
    pub include_design_docs: bool,
    pub design_doc_section_id: Option<String>,
    /// Token budget override for this request.
    pub max_tokens: Option<usize>,
    /// Relevance floor override for this request.
    pub min_relevance_score: Option<f32>,
    /// Include the selected items in the response.
    #[serde(default)]
    pub explain: bool,
}

/// Response for a context request.
#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub context: String,
    pub stats: OrchestrationStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RankedItem>>,
}

/// Build a grounding context for a query.
/// POST /context
pub async fn build_context(
    State(state): State<AppState>,
    Json(request): Json<ContextRequest>,
) -> ApiResult<Json<ContextResponse>> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }
    if request.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let orchestrator = state.orchestrator_with(|config| {
        if let Some(max_tokens) = request.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(score) = request.min_relevance_score {
            config.min_relevance_score = score;
        }
    })?;

    let filters = OrchestrationFilters {
        organization_id: request.organization_id,
        include_design_docs: request.include_design_docs,
        design_doc_section_id: request.design_doc_section_id,
    };

    let outcome = orchestrator
        .orchestrate_detailed(&request.query, request.limit, &filters)
        .await;
    debug!(
        selected = outcome.stats.selected,
        tokens = outcome.stats.estimated_tokens,
        "context built"
    );

    Ok(Json(ContextResponse {
        context: outcome.context,
        stats: outcome.stats,
        items: request.explain.then_some(outcome.items),
    }))
}
