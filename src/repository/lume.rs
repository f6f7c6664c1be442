use async_trait::async_trait;
use uuid::Uuid;

use super::{stored_id, stored_list, LumeRepository};
use crate::db::{self, BoundingBox, CreateLumeParams, DbPool, LumeRow, UpdateLumeParams};
use crate::error::{Error, Result};
use crate::models::{GeoBounds, Lume, LumeType, Page, RecordRef};

/// Lume repository backed by SQLite.
#[derive(Clone)]
pub struct SqlLumeRepository {
    db: DbPool,
}

impl SqlLumeRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl TryFrom<LumeRow> for Lume {
    type Error = crate::Error;

    fn try_from(row: LumeRow) -> Result<Self> {
        let lume_type = LumeType::from_str(&row.lume_type)
            .ok_or_else(|| Error::Internal(format!("unknown lume type '{}'", row.lume_type)))?;

        Ok(Self {
            id: row.id,
            lume_id: stored_id(&row.lume_id, "lume_id")?,
            lumo_id: stored_id(&row.lumo_id, "lumo_id")?,
            lume_type,
            name: row.name,
            description: row.description.unwrap_or_default(),
            date_start: row.date_start,
            date_end: row.date_end,
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address,
            booking_link: row.booking_link,
            images: stored_list(&row.images, "images")?,
            category_tags: stored_list(&row.category_tags, "category_tags")?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Empty descriptions are stored as NULL.
fn stored_description(description: &str) -> Option<String> {
    if description.is_empty() {
        None
    } else {
        Some(description.to_string())
    }
}

fn to_create_params(lume: &Lume) -> Result<CreateLumeParams> {
    Ok(CreateLumeParams {
        lume_id: lume.lume_id.to_string(),
        lumo_id: lume.lumo_id.to_string(),
        lume_type: lume.lume_type.as_str().to_string(),
        name: lume.name.clone(),
        description: stored_description(&lume.description),
        date_start: lume.date_start,
        date_end: lume.date_end,
        latitude: lume.latitude,
        longitude: lume.longitude,
        address: lume.address.clone(),
        images: serde_json::to_string(&lume.images)?,
        category_tags: serde_json::to_string(&lume.category_tags)?,
        booking_link: lume.booking_link.clone(),
        created_at: lume.created_at,
        updated_at: lume.updated_at,
    })
}

fn to_update_params(lume: &Lume) -> Result<UpdateLumeParams> {
    Ok(UpdateLumeParams {
        lume_id: lume.lume_id.to_string(),
        lume_type: lume.lume_type.as_str().to_string(),
        name: lume.name.clone(),
        description: stored_description(&lume.description),
        date_start: lume.date_start,
        date_end: lume.date_end,
        latitude: lume.latitude,
        longitude: lume.longitude,
        address: lume.address.clone(),
        images: serde_json::to_string(&lume.images)?,
        category_tags: serde_json::to_string(&lume.category_tags)?,
        booking_link: lume.booking_link.clone(),
        updated_at: lume.updated_at,
    })
}

fn into_lumes(rows: Vec<LumeRow>) -> Result<Vec<Lume>> {
    rows.into_iter().map(Lume::try_from).collect()
}

#[async_trait]
impl LumeRepository for SqlLumeRepository {
    async fn create(&self, lume: &Lume) -> Result<Lume> {
        db::create_lume(&self.db, to_create_params(lume)?).await?.try_into()
    }

    async fn get(&self, id: RecordRef) -> Result<Lume> {
        let row = match id {
            RecordRef::Internal(id) => db::get_lume_by_id(&self.db, id).await?,
            RecordRef::External(lume_id) => {
                db::get_lume_by_lume_id(&self.db, &lume_id.to_string()).await?
            }
        };
        row.try_into()
    }

    async fn list_by_lumo(&self, lumo_id: Uuid, page: Page) -> Result<Vec<Lume>> {
        let rows = db::list_lumes_by_lumo_id(
            &self.db,
            &lumo_id.to_string(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_lumes(rows)
    }

    async fn list_by_type(
        &self,
        lumo_id: Uuid,
        lume_type: LumeType,
        page: Page,
    ) -> Result<Vec<Lume>> {
        let rows = db::list_lumes_by_type(
            &self.db,
            &lumo_id.to_string(),
            lume_type.as_str(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_lumes(rows)
    }

    async fn search_by_location(
        &self,
        lumo_id: Uuid,
        bounds: GeoBounds,
        page: Page,
    ) -> Result<Vec<Lume>> {
        let bounds = BoundingBox {
            min_lat: bounds.min_lat,
            max_lat: bounds.max_lat,
            min_lng: bounds.min_lng,
            max_lng: bounds.max_lng,
        };
        let rows = db::search_lumes_by_location(
            &self.db,
            &lumo_id.to_string(),
            bounds,
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_lumes(rows)
    }

    async fn update(&self, lume: &Lume) -> Result<Lume> {
        db::update_lume(&self.db, to_update_params(lume)?).await?.try_into()
    }

    async fn delete(&self, id: RecordRef) -> Result<()> {
        match id {
            RecordRef::Internal(id) => db::delete_lume(&self.db, id).await,
            RecordRef::External(lume_id) => {
                db::delete_lume_by_lume_id(&self.db, &lume_id.to_string()).await
            }
        }
    }

    async fn count_by_lumo(&self, lumo_id: Uuid) -> Result<i64> {
        db::count_lumes_by_lumo_id(&self.db, &lumo_id.to_string()).await
    }
}
