//! SQLite persistence layer for the tree monitor.
//!
//! This crate is the only code that talks to the database. It provides async
//! operations for users, trees, measurements and the token ledger using SQLx
//! with SQLite. Each operation is a single query; callers decide how to
//! sequence them.
//!
//! # Example
//!
//! ```no_run
//! use database::{models::{NewTree, NewUser}, tree, user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:tree_monitor.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Provision an owner and a tree
//!     let owner = user::create_user(db.pool(), &NewUser {
//!         username: "alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!     }).await?;
//!     tree::create_tree(db.pool(), &NewTree {
//!         name: "Old Oak".to_string(),
//!         location: Some("North field".to_string()),
//!         sensor_id: "sensor-1".to_string(),
//!         user_id: owner.id,
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod measurement;
pub mod models;
pub mod token_transaction;
pub mod tree;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{
    Measurement, NewMeasurement, NewTokenTransaction, NewTree, NewUser, TokenTransaction,
    TransactionType, Tree, User,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:data/tree_monitor.db?mode=rwc").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// In-memory databases (`sqlite::memory:`) are private to each
    /// connection, so they need a pool size of 1.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed(db: &Database) -> (User, Tree) {
        let owner = user::create_user(
            db.pool(),
            &NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            },
        )
        .await
        .unwrap();

        let tree = tree::create_tree(
            db.pool(),
            &NewTree {
                name: "Old Oak".to_string(),
                location: Some("North field".to_string()),
                sensor_id: "sensor-1".to_string(),
                user_id: owner.id,
            },
        )
        .await
        .unwrap();

        (owner, tree)
    }

    fn reading(tree_id: i64, timestamp: DateTime<Utc>) -> NewMeasurement {
        NewMeasurement {
            tree_id,
            soil_moisture: 45.5,
            temperature: -3.25,
            tilt: 5.0,
            battery_level: 90.0,
            timestamp,
            tokens_awarded: 15,
        }
    }

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let db = test_db().await;
        let (owner, _) = seed(&db).await;

        let fetched = user::get_user(db.pool(), owner.id).await.unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.token_balance, 0);

        let missing = user::get_user(db.pool(), owner.id + 100).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        seed(&db).await;

        let result = user::create_user(
            db.pool(),
            &NewUser {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_tree_lookup_by_sensor() {
        let db = test_db().await;
        let (owner, tree) = seed(&db).await;

        let fetched = tree::get_tree_by_sensor_id(db.pool(), "sensor-1").await.unwrap();
        assert_eq!(fetched, tree);
        assert_eq!(fetched.user_id, owner.id);

        let missing = tree::get_tree_by_sensor_id(db.pool(), "sensor-404").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_sensor_id_is_unique() {
        let db = test_db().await;
        let (owner, _) = seed(&db).await;

        let result = tree::create_tree(
            db.pool(),
            &NewTree {
                name: "Birch".to_string(),
                location: None,
                sensor_id: "sensor-1".to_string(),
                user_id: owner.id,
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_list_trees_ordered_by_id() {
        let db = test_db().await;
        let (owner, first) = seed(&db).await;

        let second = tree::create_tree(
            db.pool(),
            &NewTree {
                name: "Birch".to_string(),
                location: None,
                sensor_id: "sensor-2".to_string(),
                user_id: owner.id,
            },
        )
        .await
        .unwrap();

        let trees = tree::list_trees(db.pool()).await.unwrap();
        let ids: Vec<i64> = trees.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(trees[1].location.is_none());
    }

    #[tokio::test]
    async fn test_measurement_roundtrip() {
        let db = test_db().await;
        let (_, tree) = seed(&db).await;

        let new = reading(tree.id, jan_first());
        let stored = measurement::insert_measurement(db.pool(), &new).await.unwrap();
        assert!(stored.id > 0);

        let listed = measurement::list_measurements_for_tree(db.pool(), tree.id, 100)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], stored);
        assert_eq!(listed[0].soil_moisture, 45.5);
        assert_eq!(listed[0].temperature, -3.25);
        assert_eq!(listed[0].timestamp, jan_first());
        assert_eq!(listed[0].tokens_awarded, 15);
    }

    #[tokio::test]
    async fn test_duplicate_detection() {
        let db = test_db().await;
        let (_, tree) = seed(&db).await;

        assert!(!measurement::measurement_exists(db.pool(), tree.id, jan_first())
            .await
            .unwrap());

        measurement::insert_measurement(db.pool(), &reading(tree.id, jan_first()))
            .await
            .unwrap();

        assert!(measurement::measurement_exists(db.pool(), tree.id, jan_first())
            .await
            .unwrap());
        assert!(!measurement::measurement_exists(
            db.pool(),
            tree.id,
            jan_first() + Duration::seconds(1)
        )
        .await
        .unwrap());

        let again = measurement::insert_measurement(db.pool(), &reading(tree.id, jan_first())).await;
        assert!(matches!(again, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_measurements_newest_first_and_limited() {
        let db = test_db().await;
        let (_, tree) = seed(&db).await;

        for hours in [2, 0, 1] {
            let ts = jan_first() + Duration::hours(hours);
            measurement::insert_measurement(db.pool(), &reading(tree.id, ts))
                .await
                .unwrap();
        }

        let all = measurement::list_measurements_for_tree(db.pool(), tree.id, 100)
            .await
            .unwrap();
        let stamps: Vec<_> = all.iter().map(|m| m.timestamp).collect();
        assert_eq!(
            stamps,
            vec![
                jan_first() + Duration::hours(2),
                jan_first() + Duration::hours(1),
                jan_first(),
            ]
        );

        let limited = measurement::list_measurements_for_tree(db.pool(), tree.id, 2)
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].timestamp, jan_first() + Duration::hours(2));
    }

    #[tokio::test]
    async fn test_credit_tokens() {
        let db = test_db().await;
        let (owner, _) = seed(&db).await;

        user::credit_tokens(db.pool(), owner.id, 15).await.unwrap();
        user::credit_tokens(db.pool(), owner.id, 10).await.unwrap();
        let fetched = user::get_user(db.pool(), owner.id).await.unwrap();
        assert_eq!(fetched.token_balance, 25);

        let missing = user::credit_tokens(db.pool(), owner.id + 100, 5).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_ledger_entries() {
        let db = test_db().await;
        let (owner, tree) = seed(&db).await;

        let stored = measurement::insert_measurement(db.pool(), &reading(tree.id, jan_first()))
            .await
            .unwrap();

        let tx = token_transaction::insert_token_transaction(
            db.pool(),
            &NewTokenTransaction {
                user_id: owner.id,
                measurement_id: Some(stored.id),
                amount: 15,
                transaction_type: TransactionType::Earn,
            },
        )
        .await
        .unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Earn);
        assert_eq!(tx.measurement_id, Some(stored.id));

        token_transaction::insert_token_transaction(
            db.pool(),
            &NewTokenTransaction {
                user_id: owner.id,
                measurement_id: None,
                amount: -5,
                transaction_type: TransactionType::Claim,
            },
        )
        .await
        .unwrap();

        let entries = token_transaction::list_transactions_for_user(db.pool(), owner.id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].transaction_type, TransactionType::Claim);

        let earned = token_transaction::sum_earned_for_user(db.pool(), owner.id)
            .await
            .unwrap();
        assert_eq!(earned, 15);
    }

    #[tokio::test]
    async fn test_ledger_requires_existing_user() {
        let db = test_db().await;

        let result = token_transaction::insert_token_transaction(
            db.pool(),
            &NewTokenTransaction {
                user_id: 42,
                measurement_id: None,
                amount: 10,
                transaction_type: TransactionType::Earn,
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
    }

    #[test]
    fn test_transaction_type_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionType::Exchange).unwrap();
        assert_eq!(json, "\"exchange\"");
        assert_eq!(TransactionType::Earn.as_str(), "earn");
    }
}
