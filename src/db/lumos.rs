//! Lumo database queries.
//!
//! Lumos are the top-level travel plan containers. Rows carry both the
//! internal auto-increment key and the public `lumo_id`.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Lumo record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct LumoRow {
    pub id: i64,
    pub lumo_id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new lumo.
#[derive(Debug, Clone)]
pub struct CreateLumoParams {
    pub lumo_id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating a lumo, keyed by its public id.
#[derive(Debug, Clone)]
pub struct UpdateLumoParams {
    pub lumo_id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Queries
// ============================================================================

/// Create a new lumo.
pub async fn create_lumo(pool: &DbPool, params: CreateLumoParams) -> Result<LumoRow> {
    sqlx::query_as::<_, LumoRow>(
        r#"
        INSERT INTO lumos (lumo_id, user_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&params.lumo_id)
    .bind(&params.user_id)
    .bind(&params.title)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a lumo by internal ID.
pub async fn get_lumo_by_id(pool: &DbPool, id: i64) -> Result<LumoRow> {
    sqlx::query_as::<_, LumoRow>("SELECT * FROM lumos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Lumo not found: {}", id)))
}

/// Get a lumo by public ID.
pub async fn get_lumo_by_lumo_id(pool: &DbPool, lumo_id: &str) -> Result<LumoRow> {
    sqlx::query_as::<_, LumoRow>("SELECT * FROM lumos WHERE lumo_id = ?")
        .bind(lumo_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Lumo not found: {}", lumo_id)))
}

/// List the lumos owned by a user, newest first.
/// Uses idx_lumos_user index.
pub async fn list_lumos_by_user_id(
    pool: &DbPool,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LumoRow>> {
    sqlx::query_as::<_, LumoRow>(
        r#"
        SELECT * FROM lumos
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Update a lumo.
pub async fn update_lumo(pool: &DbPool, params: UpdateLumoParams) -> Result<LumoRow> {
    sqlx::query_as::<_, LumoRow>(
        r#"
        UPDATE lumos SET title = ?, updated_at = ?
        WHERE lumo_id = ?
        RETURNING *
        "#,
    )
    .bind(&params.title)
    .bind(params.updated_at)
    .bind(&params.lumo_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Lumo not found: {}", params.lumo_id)))
}

/// Delete a lumo by internal ID.
pub async fn delete_lumo(pool: &DbPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM lumos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Lumo not found: {}", id)));
    }

    Ok(())
}

/// Delete a lumo by public ID.
pub async fn delete_lumo_by_lumo_id(pool: &DbPool, lumo_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM lumos WHERE lumo_id = ?")
        .bind(lumo_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Lumo not found: {}", lumo_id)));
    }

    Ok(())
}

/// Count the lumos owned by a user.
pub async fn count_lumos_by_user_id(pool: &DbPool, user_id: &str) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lumos WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
