//! Sensor readings.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Measurement, NewMeasurement};

/// Whether a reading with this exact device timestamp is already stored for the tree.
pub async fn measurement_exists(
    pool: &SqlitePool,
    tree_id: i64,
    timestamp: DateTime<Utc>,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM measurements
            WHERE tree_id = ? AND timestamp = ?
        )
        "#,
    )
    .bind(tree_id)
    .bind(timestamp)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Store a reading, returning it with its ID and receive time.
///
/// A reading that collides with an existing (tree, timestamp) pair fails
/// with `AlreadyExists`.
pub async fn insert_measurement(pool: &SqlitePool, m: &NewMeasurement) -> Result<Measurement> {
    sqlx::query_as::<_, Measurement>(
        r#"
        INSERT INTO measurements
            (tree_id, soil_moisture, temperature, tilt, battery_level, timestamp, tokens_awarded)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, tree_id, soil_moisture, temperature, tilt, battery_level,
                  timestamp, received_at, tokens_awarded
        "#,
    )
    .bind(m.tree_id)
    .bind(m.soil_moisture)
    .bind(m.temperature)
    .bind(m.tilt)
    .bind(m.battery_level)
    .bind(m.timestamp)
    .bind(m.tokens_awarded)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        DatabaseError::from_insert(
            e,
            "Measurement",
            format!("tree {} at {}", m.tree_id, m.timestamp.to_rfc3339()),
        )
    })
}

/// Most recent readings for a tree, newest device timestamp first.
pub async fn list_measurements_for_tree(
    pool: &SqlitePool,
    tree_id: i64,
    limit: i64,
) -> Result<Vec<Measurement>> {
    let rows = sqlx::query_as::<_, Measurement>(
        r#"
        SELECT id, tree_id, soil_moisture, temperature, tilt, battery_level,
               timestamp, received_at, tokens_awarded
        FROM measurements
        WHERE tree_id = ?
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(tree_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
