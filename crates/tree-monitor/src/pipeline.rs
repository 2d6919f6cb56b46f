//! Webhook ingestion pipeline.
//!
//! One call runs the stages in order, stopping at the first rejection:
//! decode, resolve device, normalize timestamp, extract fields, validate,
//! deduplicate, score, persist, credit, record ledger entry.
//!
//! Crediting the owner and recording the ledger entry happen after the
//! measurement is stored and are best effort: failures are logged and the
//! reading is still reported as stored.

use chrono::{DateTime, Utc};
use database::models::{Measurement, NewMeasurement, NewTokenTransaction, TransactionType, Tree};
use database::{measurement, token_transaction, tree, user, Database, DatabaseError};
use rewards::{check_reading, Reading, TokenCalculator, ValidationError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::payload::{normalize_timestamp, WebhookPayload};

/// Result of a successfully processed webhook call.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The reading was stored.
    Stored {
        measurement: Measurement,
        tokens_awarded: i64,
        /// Whether the owner's balance was updated.
        credited: bool,
        /// Ledger entry ID, if it was recorded.
        transaction_id: Option<i64>,
    },
    /// A reading with the same tree and timestamp was already stored.
    Duplicate,
}

/// Reasons a webhook call is rejected.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request body is not a valid payload.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// No tree carries the reported sensor ID.
    #[error("device not registered: {0}")]
    UnknownDevice(String),

    /// Device lookup failed for a reason other than absence.
    #[error("device lookup failed: {0}")]
    DeviceLookup(#[source] DatabaseError),

    /// A sensor value is outside its plausible range.
    #[error("invalid reading: {0}")]
    InvalidReading(#[from] ValidationError),

    /// Duplicate check query failed.
    #[error("duplicate check failed: {0}")]
    DuplicateCheck(#[source] DatabaseError),

    /// Measurement insert failed.
    #[error("failed to store measurement: {0}")]
    Store(#[source] DatabaseError),
}

/// Sequences validation, scoring and persistence for incoming readings.
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    db: Database,
    calculator: TokenCalculator,
}

impl IngestPipeline {
    pub fn new(db: Database, calculator: TokenCalculator) -> Self {
        Self { db, calculator }
    }

    /// Process a raw webhook body.
    pub async fn ingest(&self, body: &[u8]) -> Result<IngestOutcome, IngestError> {
        let payload = WebhookPayload::from_slice(body).map_err(|err| {
            warn!(error = %err, "Invalid webhook payload");
            IngestError::MalformedPayload(err)
        })?;

        self.ingest_payload(&payload, Utc::now()).await
    }

    /// Process a decoded payload. `now` stands in for unparseable device timestamps.
    pub async fn ingest_payload(
        &self,
        payload: &WebhookPayload,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome, IngestError> {
        let pool = self.db.pool();
        let device_id = payload.device_id.as_str();

        debug!(device_id, "Received uplink");

        let tree = match tree::get_tree_by_sensor_id(pool, device_id).await {
            Ok(tree) => tree,
            Err(DatabaseError::NotFound { .. }) => {
                warn!(device_id, "Unknown device");
                return Err(IngestError::UnknownDevice(device_id.to_string()));
            }
            Err(err) => {
                error!(device_id, error = %err, "Device lookup failed");
                return Err(IngestError::DeviceLookup(err));
            }
        };

        let timestamp = normalize_timestamp(&payload.timestamp, now);
        let reading = payload.reading();

        if let Err(err) = check_reading(&reading) {
            warn!(device_id, tree_id = tree.id, error = %err, "Invalid measurement data");
            return Err(IngestError::InvalidReading(err));
        }

        let duplicate = measurement::measurement_exists(pool, tree.id, timestamp)
            .await
            .map_err(|err| {
                error!(tree_id = tree.id, error = %err, "Duplicate check failed");
                IngestError::DuplicateCheck(err)
            })?;

        if duplicate {
            debug!(tree_id = tree.id, %timestamp, "Duplicate measurement ignored");
            return Ok(IngestOutcome::Duplicate);
        }

        self.score_and_store(&tree, &reading, timestamp).await
    }

    /// Score a validated, non-duplicate reading, store it and credit the owner.
    async fn score_and_store(
        &self,
        tree: &Tree,
        reading: &Reading,
        timestamp: DateTime<Utc>,
    ) -> Result<IngestOutcome, IngestError> {
        let pool = self.db.pool();
        let tokens_awarded = self.calculator.calculate(reading);

        let new_measurement = NewMeasurement {
            tree_id: tree.id,
            soil_moisture: reading.soil_moisture,
            temperature: reading.temperature,
            tilt: reading.tilt,
            battery_level: reading.battery_level,
            timestamp,
            tokens_awarded,
        };

        let stored = match measurement::insert_measurement(pool, &new_measurement).await {
            Ok(stored) => stored,
            // Lost a race with a concurrent delivery of the same reading.
            Err(DatabaseError::AlreadyExists { .. }) => {
                debug!(tree_id = tree.id, %timestamp, "Duplicate measurement ignored on insert");
                return Ok(IngestOutcome::Duplicate);
            }
            Err(err) => {
                error!(tree_id = tree.id, error = %err, "Failed to store measurement");
                return Err(IngestError::Store(err));
            }
        };

        let credited = match user::credit_tokens(pool, tree.user_id, tokens_awarded).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    user_id = tree.user_id,
                    measurement_id = stored.id,
                    error = %err,
                    "Failed to update token balance"
                );
                false
            }
        };

        let ledger_entry = NewTokenTransaction {
            user_id: tree.user_id,
            measurement_id: Some(stored.id),
            amount: tokens_awarded,
            transaction_type: TransactionType::Earn,
        };

        let transaction_id = match token_transaction::insert_token_transaction(pool, &ledger_entry)
            .await
        {
            Ok(tx) => Some(tx.id),
            Err(err) => {
                error!(
                    user_id = tree.user_id,
                    measurement_id = stored.id,
                    error = %err,
                    "Failed to record token transaction"
                );
                None
            }
        };

        info!(
            tree_id = tree.id,
            user_id = tree.user_id,
            measurement_id = stored.id,
            tokens_awarded,
            "Measurement stored"
        );

        Ok(IngestOutcome::Stored {
            measurement: stored,
            tokens_awarded,
            credited,
            transaction_id,
        })
    }
}
