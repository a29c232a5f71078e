//! Built-in provider adapters.
//!
//! Each adapter wraps one backend trait from [`crate::traits`] and turns its
//! rendered markdown into per-section items. Backend errors end up as empty
//! lists with a warning.

mod design_docs;
mod knowledge_graph;
mod mcp;
mod sections;

pub use design_docs::DesignDocsProvider;
pub use knowledge_graph::KnowledgeGraphProvider;
pub use mcp::{McpProvider, SEARCH_TOOL};
pub use sections::{split_sections, Section};

