pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Role catalog
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route("/api/v1/roles/:id", get(handlers::handle_get_role))
        // Analysis
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/score", post(handlers::handle_score_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
