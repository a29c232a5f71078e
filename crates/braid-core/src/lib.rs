//! braid-core - Core library for braid.
//!
//! This crate provides the information item model, the provider boundary,
//! the built-in provider adapters, and the retrieval fusion pipeline that
//! merges several sources into one token-budgeted prompt context.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use braid_core::{KnowledgeGraphProvider, OrchestrationConfig, OrchestrationFilters, RagOrchestrator};
//!
//! let providers = vec![Arc::new(KnowledgeGraphProvider::new(searcher)) as _];
//! let orchestrator = RagOrchestrator::new(OrchestrationConfig::default(), providers)?;
//!
//! let context = orchestrator
//!     .orchestrate("who owns billing?", 10, &OrchestrationFilters::for_organization("acme"))
//!     .await;
//! ```

pub mod config;
pub mod error;
pub mod orchestration;
pub mod providers;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{OrchestrationConfig, OrchestrationConfigBuilder, SourceWeights};
pub use error::{BraidError, BraidResult, ErrorCode};
pub use orchestration::{
    orchestrated_context, OrchestrationOutcome, OrchestrationStats, RagOrchestrator,
};
pub use providers::{DesignDocsProvider, KnowledgeGraphProvider, McpProvider};
pub use traits::{
    DesignDocSearcher, HitKind, KnowledgeGraphContext, KnowledgeGraphHit, KnowledgeGraphSearcher,
    OrchestrationFilters, Provider, ProviderFilters, ToolExecutor, ToolRequest, ToolResult,
};
pub use types::{InformationItem, InformationSource, ItemMetadata, RankedItem};
