//! Route definitions for the HTTP API.

mod analyze;
mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/analyze-cad", post(analyze::analyze_cad))
        .route("/analyses", get(analyze::get_analysis))
        .with_state(state)
}

pub use analyze::*;
pub use health::*;
