//! LoRaWAN webhook ingestion and reward API for monitored trees.
//!
//! Sensors report through a network server that forwards each uplink to
//! `POST /webhook/lorawan`. Accepted readings are stored and earn their
//! tree's owner reward tokens. Read endpoints expose trees, measurement
//! history and balances.

pub mod config;
pub mod error;
pub mod payload;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application with state and request tracing attached.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
