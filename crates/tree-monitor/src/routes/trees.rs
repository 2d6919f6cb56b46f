//! Tree and measurement history routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use database::models::{Measurement, Tree};

use super::parse_id;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// History length when `limit` is absent, unparseable or negative.
pub const DEFAULT_MEASUREMENT_LIMIT: i64 = 100;

/// List all registered trees.
pub async fn list_trees(State(state): State<AppState>) -> Result<Json<Vec<Tree>>> {
    let trees = database::tree::list_trees(state.db.pool()).await?;
    Ok(Json(trees))
}

/// Measurement history for one tree, newest first.
///
/// `limit=0` yields an empty list.
pub async fn list_measurements(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Measurement>>> {
    let tree_id = parse_id(&id).ok_or_else(|| ApiError::BadRequest("Invalid tree ID".to_string()))?;
    let limit = parse_limit(params.get("limit").map(String::as_str));

    let measurements =
        database::measurement::list_measurements_for_tree(state.db.pool(), tree_id, limit).await?;
    Ok(Json(measurements))
}

fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n >= 0)
        .unwrap_or(DEFAULT_MEASUREMENT_LIMIT)
}
