//! Registered trees and their sensors.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewTree, Tree};

/// Register a tree. The sensor ID must not already be in use.
pub async fn create_tree(pool: &SqlitePool, tree: &NewTree) -> Result<Tree> {
    sqlx::query_as::<_, Tree>(
        r#"
        INSERT INTO trees (name, location, sensor_id, user_id)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, location, sensor_id, user_id, created_at
        "#,
    )
    .bind(&tree.name)
    .bind(&tree.location)
    .bind(&tree.sensor_id)
    .bind(tree.user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "Tree", tree.sensor_id.clone()))
}

/// Look up the tree carrying the given external sensor ID.
pub async fn get_tree_by_sensor_id(pool: &SqlitePool, sensor_id: &str) -> Result<Tree> {
    sqlx::query_as::<_, Tree>(
        r#"
        SELECT id, name, location, sensor_id, user_id, created_at
        FROM trees
        WHERE sensor_id = ?
        "#,
    )
    .bind(sensor_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Tree",
        id: sensor_id.to_string(),
    })
}

/// List all trees, ordered by ID.
pub async fn list_trees(pool: &SqlitePool) -> Result<Vec<Tree>> {
    let trees = sqlx::query_as::<_, Tree>(
        r#"
        SELECT id, name, location, sensor_id, user_id, created_at
        FROM trees
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(trees)
}
