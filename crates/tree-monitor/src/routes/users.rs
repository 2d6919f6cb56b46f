//! User balance and ledger routes.

use axum::extract::{Path, State};
use axum::Json;
use database::models::TokenTransaction;
use serde::Serialize;

use super::parse_id;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Token balance summary.
#[derive(Debug, Serialize)]
pub struct TokenBalance {
    pub user_id: i64,
    pub username: String,
    pub token_balance: i64,
}

/// Current token balance for a user.
pub async fn token_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TokenBalance>> {
    let user_id = parse_id(&id).ok_or_else(|| ApiError::BadRequest("Invalid user ID".to_string()))?;

    let user = database::user::get_user(state.db.pool(), user_id)
        .await
        .map_err(|err| ApiError::from_lookup(err, "User not found"))?;

    Ok(Json(TokenBalance {
        user_id: user.id,
        username: user.username,
        token_balance: user.token_balance,
    }))
}

/// Ledger entries for a user, newest first.
pub async fn transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TokenTransaction>>> {
    let user_id = parse_id(&id).ok_or_else(|| ApiError::BadRequest("Invalid user ID".to_string()))?;
    let pool = state.db.pool();

    database::user::get_user(pool, user_id)
        .await
        .map_err(|err| ApiError::from_lookup(err, "User not found"))?;

    let entries = database::token_transaction::list_transactions_for_user(pool, user_id).await?;
    Ok(Json(entries))
}
