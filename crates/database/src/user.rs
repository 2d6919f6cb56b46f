//! User accounts and token balances.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User};

/// Provision a new user with a zero balance.
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email)
        VALUES (?, ?)
        RETURNING id, username, email, token_balance, created_at
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "User", user.username.clone()))
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, token_balance, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Add `amount` tokens to a user's balance.
///
/// Fails with `NotFound` when no user has the given ID.
pub async fn credit_tokens(pool: &SqlitePool, id: i64, amount: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET token_balance = token_balance + ?
        WHERE id = ?
        "#,
    )
    .bind(amount)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}
