//! Application state shared across handlers.

use database::Database;
use rewards::TokenCalculator;

use crate::pipeline::IngestPipeline;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Webhook ingestion pipeline.
    pub pipeline: IngestPipeline,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, calculator: TokenCalculator) -> Self {
        let pipeline = IngestPipeline::new(db.clone(), calculator);
        Self { db, pipeline }
    }
}
