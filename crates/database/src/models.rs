//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user accumulating reward tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Current token balance. Only changed by ledger activity.
    pub token_balance: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to provision a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// A monitored tree, paired with exactly one sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tree {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form location, if known.
    pub location: Option<String>,
    /// External device identifier supplied by the network server.
    pub sensor_id: String,
    /// Owner credited for this tree's readings.
    pub user_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to register a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTree {
    pub name: String,
    pub location: Option<String>,
    pub sensor_id: String,
    pub user_id: i64,
}

/// One stored sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Measurement {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Tree the reading belongs to.
    pub tree_id: i64,
    /// Soil moisture, percent.
    pub soil_moisture: f64,
    /// Temperature, °C.
    pub temperature: f64,
    /// Tilt, degrees.
    pub tilt: f64,
    /// Battery level, percent.
    pub battery_level: f64,
    /// Time reported by the device, normalized to UTC.
    pub timestamp: DateTime<Utc>,
    /// Time the server stored the reading.
    pub received_at: DateTime<Utc>,
    /// Tokens awarded for this reading.
    pub tokens_awarded: i64,
}

/// A reading ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub tree_id: i64,
    pub soil_moisture: f64,
    pub temperature: f64,
    pub tilt: f64,
    pub battery_level: f64,
    pub timestamp: DateTime<Utc>,
    pub tokens_awarded: i64,
}

/// Kind of balance change recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransactionType {
    Earn,
    Claim,
    Exchange,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Earn => "earn",
            TransactionType::Claim => "claim",
            TransactionType::Exchange => "exchange",
        }
    }
}

/// An append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TokenTransaction {
    /// Auto-incrementing ID.
    pub id: i64,
    /// User whose balance changed.
    pub user_id: i64,
    /// Measurement that produced the entry (earn entries only).
    pub measurement_id: Option<i64>,
    /// Signed token amount.
    pub amount: i64,
    /// Entry kind.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A ledger entry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTokenTransaction {
    pub user_id: i64,
    pub measurement_id: Option<i64>,
    pub amount: i64,
    pub transaction_type: TransactionType,
}
