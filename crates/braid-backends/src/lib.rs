//! braid-backends - HTTP backend clients for braid.
//!
//! This crate implements the braid-core backend traits against HTTP services
//! and wires them into providers from a [`BackendsConfig`].
//!
//! # Example
//!
//! ```ignore
//! use braid_backends::{BackendsConfig, ProviderFactory};
//! use braid_core::{OrchestrationConfig, RagOrchestrator};
//!
//! let providers = ProviderFactory::create(&BackendsConfig::from_env()?)?;
//! let orchestrator = RagOrchestrator::new(OrchestrationConfig::from_env()?, providers)?;
//! ```

pub mod config;
pub mod design_docs;
pub mod factory;
mod http;
pub mod knowledge_graph;
pub mod tools;

pub use config::{BackendsConfig, HttpBackendConfig};
pub use design_docs::HttpDesignDocs;
pub use factory::ProviderFactory;
pub use knowledge_graph::HttpKnowledgeGraph;
pub use tools::HttpToolRuntime;
