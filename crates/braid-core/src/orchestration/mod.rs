//! The retrieval fusion pipeline.
//!
//! One call runs: concurrent fetch, weighting, prefix deduplication, global
//! ranking, relevance filtering, greedy token-budget selection, and grouped
//! assembly. Everything after the fetch join is pure.

mod assembly;
mod budget;
mod dedup;
mod orchestrator;
mod ranking;

pub use assembly::build_context;
pub use budget::{
    estimate_tokens, select_within_budget, BudgetSelection, CHARS_PER_TOKEN,
    MIN_TRUNCATION_TOKENS, TRUNCATION_MARKER,
};
pub use dedup::{deduplicate, ContentFingerprint, FINGERPRINT_CHARS};
pub use orchestrator::{
    orchestrated_context, OrchestrationOutcome, OrchestrationStats, RagOrchestrator,
};
pub use ranking::{diversify, filter_relevant, rank};
