//! Link database queries.
//!
//! Links form directed edges between two lumes. Travel details are
//! stored as a JSON object in `travel_details`.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Link record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct LinkRow {
    pub id: i64,
    pub link_id: String,
    pub from_lume_id: String,
    pub to_lume_id: String,
    pub link_type: String,
    /// JSON object, NULL when the link has no travel details
    pub travel_details: Option<String>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new link.
#[derive(Debug, Clone)]
pub struct CreateLinkParams {
    pub link_id: String,
    pub from_lume_id: String,
    pub to_lume_id: String,
    pub link_type: String,
    pub travel_details: Option<String>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating a link.
#[derive(Debug, Clone)]
pub struct UpdateLinkParams {
    pub link_id: String,
    pub from_lume_id: String,
    pub to_lume_id: String,
    pub link_type: String,
    pub travel_details: Option<String>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Queries
// ============================================================================

/// Create a new link.
pub async fn create_link(pool: &DbPool, params: CreateLinkParams) -> Result<LinkRow> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        INSERT INTO links (
            link_id, from_lume_id, to_lume_id, link_type,
            travel_details, notes, sequence_index, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&params.link_id)
    .bind(&params.from_lume_id)
    .bind(&params.to_lume_id)
    .bind(&params.link_type)
    .bind(&params.travel_details)
    .bind(&params.notes)
    .bind(params.sequence_index)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a link by internal ID.
pub async fn get_link_by_id(pool: &DbPool, id: i64) -> Result<LinkRow> {
    sqlx::query_as::<_, LinkRow>("SELECT * FROM links WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Link not found: {}", id)))
}

/// Get a link by public ID.
pub async fn get_link_by_link_id(pool: &DbPool, link_id: &str) -> Result<LinkRow> {
    sqlx::query_as::<_, LinkRow>("SELECT * FROM links WHERE link_id = ?")
        .bind(link_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Link not found: {}", link_id)))
}

/// Get outgoing links from a lume.
/// Uses idx_links_from index.
pub async fn list_links_from_lume(
    pool: &DbPool,
    from_lume_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        SELECT * FROM links
        WHERE from_lume_id = ?
        ORDER BY sequence_index IS NULL, sequence_index, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(from_lume_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Get incoming links to a lume.
/// Uses idx_links_to index.
pub async fn list_links_to_lume(
    pool: &DbPool,
    to_lume_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        SELECT * FROM links
        WHERE to_lume_id = ?
        ORDER BY sequence_index IS NULL, sequence_index, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(to_lume_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Get all links touching a lume in either direction.
pub async fn list_links_for_lume(
    pool: &DbPool,
    lume_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        SELECT * FROM links
        WHERE from_lume_id = ? OR to_lume_id = ?
        ORDER BY sequence_index IS NULL, sequence_index, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(lume_id)
    .bind(lume_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Get links from one lume to another.
pub async fn list_links_between(
    pool: &DbPool,
    from_lume_id: &str,
    to_lume_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        SELECT * FROM links
        WHERE from_lume_id = ? AND to_lume_id = ?
        ORDER BY sequence_index IS NULL, sequence_index, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(from_lume_id)
    .bind(to_lume_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Get links of a given type.
/// Uses idx_links_type index.
pub async fn list_links_by_type(
    pool: &DbPool,
    link_type: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        SELECT * FROM links
        WHERE link_type = ?
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(link_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Get links of a given type touching a lume in either direction.
pub async fn list_links_for_lume_by_type(
    pool: &DbPool,
    lume_id: &str,
    link_type: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        SELECT * FROM links
        WHERE (from_lume_id = ? OR to_lume_id = ?) AND link_type = ?
        ORDER BY sequence_index IS NULL, sequence_index, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(lume_id)
    .bind(lume_id)
    .bind(link_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Update a link.
pub async fn update_link(pool: &DbPool, params: UpdateLinkParams) -> Result<LinkRow> {
    sqlx::query_as::<_, LinkRow>(
        r#"
        UPDATE links SET
            from_lume_id = ?,
            to_lume_id = ?,
            link_type = ?,
            travel_details = ?,
            notes = ?,
            sequence_index = ?,
            updated_at = ?
        WHERE link_id = ?
        RETURNING *
        "#,
    )
    .bind(&params.from_lume_id)
    .bind(&params.to_lume_id)
    .bind(&params.link_type)
    .bind(&params.travel_details)
    .bind(&params.notes)
    .bind(params.sequence_index)
    .bind(params.updated_at)
    .bind(&params.link_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Link not found: {}", params.link_id)))
}

/// Delete a link by internal ID.
pub async fn delete_link(pool: &DbPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM links WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Link not found: {}", id)));
    }

    Ok(())
}

/// Delete a link by public ID.
pub async fn delete_link_by_link_id(pool: &DbPool, link_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM links WHERE link_id = ?")
        .bind(link_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Link not found: {}", link_id)));
    }

    Ok(())
}

/// Count links touching a lume in either direction.
pub async fn count_links_for_lume(pool: &DbPool, lume_id: &str) -> Result<i64> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM links WHERE from_lume_id = ? OR to_lume_id = ?")
            .bind(lume_id)
            .bind(lume_id)
            .fetch_one(pool)
            .await?;
    Ok(count.0)
}

/// Count outgoing links from a lume.
pub async fn count_links_from_lume(pool: &DbPool, from_lume_id: &str) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links WHERE from_lume_id = ?")
        .bind(from_lume_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Count incoming links to a lume.
pub async fn count_links_to_lume(pool: &DbPool, to_lume_id: &str) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links WHERE to_lume_id = ?")
        .bind(to_lume_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
