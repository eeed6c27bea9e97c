//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Create all API routes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))

        // Classification
        .route("/api/detect", post(handlers::detect_address))

        // Reputation
        .route("/api/analyze", post(handlers::analyze_address))
        .route("/api/score", post(handlers::score_bundle))
        .route("/api/token-score/:network/:address", get(handlers::get_token_score))
        .route("/api/history", get(handlers::get_history))

        .with_state(state)
}
