//! Integration tests for the REST API.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use braid_core::traits::{Provider, ProviderFilters};
use braid_core::{InformationItem, InformationSource, OrchestrationConfig, RagOrchestrator};
use braid_server::{create_server, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StaticGraph;

#[async_trait]
impl Provider for StaticGraph {
    fn name(&self) -> &str {
        "knowledgeGraph"
    }

    fn source(&self) -> InformationSource {
        InformationSource::KnowledgeGraph
    }

    async fn fetch(
        &self,
        _query: &str,
        _limit: usize,
        filters: &ProviderFilters,
    ) -> Vec<InformationItem> {
        let org = filters.organization_id.as_deref().unwrap_or("none");
        vec![
            InformationItem::new("kg-0", InformationSource::KnowledgeGraph, format!("Org {org} owns billing."), 0.9),
            InformationItem::new("kg-1", InformationSource::KnowledgeGraph, "x".repeat(2000), 0.6),
        ]
    }

    fn scope_filters(&self, filters: &braid_core::OrchestrationFilters) -> ProviderFilters {
        ProviderFilters {
            organization_id: filters.organization_id.clone(),
            ..Default::default()
        }
    }
}

fn app() -> Router {
    let orchestrator =
        RagOrchestrator::new(OrchestrationConfig::default(), vec![Arc::new(StaticGraph)]).unwrap();
    create_server(AppState::new(orchestrator))
}

async fn post_context(body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/context")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_lists_providers() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], json!(["knowledgeGraph"]));
}

#[tokio::test]
async fn test_context_default_request() {
    let (status, body) = post_context(json!({
        "query": "who owns billing",
        "organization_id": "acme"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let context = body["context"].as_str().unwrap();
    assert!(context.starts_with("## Knowledge graph information\n\nOrg acme owns billing."));
    assert_eq!(body["stats"]["selected"], 2);
    assert!(body.get("items").is_none());
}

#[tokio::test]
async fn test_context_overrides_and_explain() {
    let (status, body) = post_context(json!({
        "query": "who owns billing",
        "min_relevance_score": 0.4,
        "explain": true
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    // 0.6 * 0.5 = 0.3 falls under the raised floor.
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "kg-0");
    assert_eq!(items[0]["source"], "knowledgeGraph");
}

#[tokio::test]
async fn test_small_budget_truncates() {
    let (status, body) = post_context(json!({
        "query": "billing",
        "max_tokens": 300,
        "explain": true
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["truncated"], true);
    assert_eq!(body["items"][1]["truncated"], true);
}

#[tokio::test]
async fn test_rejects_bad_requests() {
    let (status, body) = post_context(json!({"query": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = post_context(json!({"query": "billing", "max_tokens": 0})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
