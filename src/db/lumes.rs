//! Lume database queries.
//!
//! Lumes are the nodes of a lumo. Optional scalars map to nullable
//! columns; `images` and `category_tags` are JSON arrays stored as text.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Lume record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct LumeRow {
    pub id: i64,
    pub lume_id: String,
    pub lumo_id: String,
    pub lume_type: String,
    pub name: String,
    pub description: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    /// JSON array of image URLs
    pub images: String,
    /// JSON array of tags
    pub category_tags: String,
    pub booking_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new lume.
#[derive(Debug, Clone)]
pub struct CreateLumeParams {
    pub lume_id: String,
    pub lumo_id: String,
    pub lume_type: String,
    pub name: String,
    pub description: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub images: String,
    pub category_tags: String,
    pub booking_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating a lume. The parent lumo is not updatable.
#[derive(Debug, Clone)]
pub struct UpdateLumeParams {
    pub lume_id: String,
    pub lume_type: String,
    pub name: String,
    pub description: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub images: String,
    pub category_tags: String,
    pub booking_link: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Bounding box filter for location search.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

// ============================================================================
// Queries
// ============================================================================

/// Create a new lume.
pub async fn create_lume(pool: &DbPool, params: CreateLumeParams) -> Result<LumeRow> {
    sqlx::query_as::<_, LumeRow>(
        r#"
        INSERT INTO lumes (
            lume_id, lumo_id, lume_type, name, description,
            date_start, date_end, latitude, longitude, address,
            images, category_tags, booking_link, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&params.lume_id)
    .bind(&params.lumo_id)
    .bind(&params.lume_type)
    .bind(&params.name)
    .bind(&params.description)
    .bind(params.date_start)
    .bind(params.date_end)
    .bind(params.latitude)
    .bind(params.longitude)
    .bind(&params.address)
    .bind(&params.images)
    .bind(&params.category_tags)
    .bind(&params.booking_link)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a lume by internal ID.
pub async fn get_lume_by_id(pool: &DbPool, id: i64) -> Result<LumeRow> {
    sqlx::query_as::<_, LumeRow>("SELECT * FROM lumes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Lume not found: {}", id)))
}

/// Get a lume by public ID.
pub async fn get_lume_by_lume_id(pool: &DbPool, lume_id: &str) -> Result<LumeRow> {
    sqlx::query_as::<_, LumeRow>("SELECT * FROM lumes WHERE lume_id = ?")
        .bind(lume_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Lume not found: {}", lume_id)))
}

/// List the lumes of a lumo in insertion order.
/// Uses idx_lumes_lumo index.
pub async fn list_lumes_by_lumo_id(
    pool: &DbPool,
    lumo_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LumeRow>> {
    sqlx::query_as::<_, LumeRow>(
        r#"
        SELECT * FROM lumes
        WHERE lumo_id = ?
        ORDER BY id ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(lumo_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// List the lumes of a lumo having the given type.
/// Uses idx_lumes_type index (lumo_id, lume_type).
pub async fn list_lumes_by_type(
    pool: &DbPool,
    lumo_id: &str,
    lume_type: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LumeRow>> {
    sqlx::query_as::<_, LumeRow>(
        r#"
        SELECT * FROM lumes
        WHERE lumo_id = ? AND lume_type = ?
        ORDER BY id ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(lumo_id)
    .bind(lume_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// List the lumes of a lumo whose coordinates fall inside a bounding box.
/// Lumes without coordinates never match.
pub async fn search_lumes_by_location(
    pool: &DbPool,
    lumo_id: &str,
    bounds: BoundingBox,
    limit: i64,
    offset: i64,
) -> Result<Vec<LumeRow>> {
    sqlx::query_as::<_, LumeRow>(
        r#"
        SELECT * FROM lumes
        WHERE lumo_id = ?
          AND latitude BETWEEN ? AND ?
          AND longitude BETWEEN ? AND ?
        ORDER BY id ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(lumo_id)
    .bind(bounds.min_lat)
    .bind(bounds.max_lat)
    .bind(bounds.min_lng)
    .bind(bounds.max_lng)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Update a lume.
pub async fn update_lume(pool: &DbPool, params: UpdateLumeParams) -> Result<LumeRow> {
    sqlx::query_as::<_, LumeRow>(
        r#"
        UPDATE lumes SET
            lume_type = ?,
            name = ?,
            description = ?,
            date_start = ?,
            date_end = ?,
            latitude = ?,
            longitude = ?,
            address = ?,
            images = ?,
            category_tags = ?,
            booking_link = ?,
            updated_at = ?
        WHERE lume_id = ?
        RETURNING *
        "#,
    )
    .bind(&params.lume_type)
    .bind(&params.name)
    .bind(&params.description)
    .bind(params.date_start)
    .bind(params.date_end)
    .bind(params.latitude)
    .bind(params.longitude)
    .bind(&params.address)
    .bind(&params.images)
    .bind(&params.category_tags)
    .bind(&params.booking_link)
    .bind(params.updated_at)
    .bind(&params.lume_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Lume not found: {}", params.lume_id)))
}

/// Delete a lume by internal ID.
pub async fn delete_lume(pool: &DbPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM lumes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Lume not found: {}", id)));
    }

    Ok(())
}

/// Delete a lume by public ID.
pub async fn delete_lume_by_lume_id(pool: &DbPool, lume_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM lumes WHERE lume_id = ?")
        .bind(lume_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Lume not found: {}", lume_id)));
    }

    Ok(())
}

/// Count the lumes of a lumo.
pub async fn count_lumes_by_lumo_id(pool: &DbPool, lumo_id: &str) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lumes WHERE lumo_id = ?")
        .bind(lumo_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
