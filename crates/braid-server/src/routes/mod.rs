//! Route definitions for the REST API.

mod context;
mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Context assembly
        .route("/context", post(context::build_context))
        // Attach state
        .with_state(state)
}

pub use context::*;
pub use health::*;
