//! Token ledger.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{NewTokenTransaction, TokenTransaction, TransactionType};

/// Append a ledger entry.
pub async fn insert_token_transaction(
    pool: &SqlitePool,
    tx: &NewTokenTransaction,
) -> Result<TokenTransaction> {
    let record = sqlx::query_as::<_, TokenTransaction>(
        r#"
        INSERT INTO token_transactions (user_id, measurement_id, amount, type)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, measurement_id, amount, type, created_at
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.measurement_id)
    .bind(tx.amount)
    .bind(tx.transaction_type)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Ledger entries for a user, newest first.
pub async fn list_transactions_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<TokenTransaction>> {
    let rows = sqlx::query_as::<_, TokenTransaction>(
        r#"
        SELECT id, user_id, measurement_id, amount, type, created_at
        FROM token_transactions
        WHERE user_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total tokens earned by a user according to the ledger.
pub async fn sum_earned_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM token_transactions
        WHERE user_id = ? AND type = ?
        "#,
    )
    .bind(user_id)
    .bind(TransactionType::Earn.as_str())
    .fetch_one(pool)
    .await?;

    Ok(total)
}
