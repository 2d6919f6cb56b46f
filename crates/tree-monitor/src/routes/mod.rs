//! Route handlers.

pub mod health;
pub mod trees;
pub mod users;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Network server uplinks
        .route("/webhook/lorawan", post(webhook::lorawan))
        // Read API
        .route("/api/v1/trees", get(trees::list_trees))
        .route("/api/v1/trees/:id/measurements", get(trees::list_measurements))
        .route("/api/v1/users/:id/tokens", get(users::token_balance))
        .route("/api/v1/users/:id/transactions", get(users::transactions))
}

/// Parse an integer path parameter.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}
