use async_trait::async_trait;
use uuid::Uuid;

use super::{stored_id, LumoRepository};
use crate::db::{self, CreateLumoParams, DbPool, LumoRow, UpdateLumoParams};
use crate::error::Result;
use crate::models::{Lumo, Page, RecordRef};

/// Lumo repository backed by SQLite.
#[derive(Clone)]
pub struct SqlLumoRepository {
    db: DbPool,
}

impl SqlLumoRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl TryFrom<LumoRow> for Lumo {
    type Error = crate::Error;

    fn try_from(row: LumoRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            lumo_id: stored_id(&row.lumo_id, "lumo_id")?,
            user_id: stored_id(&row.user_id, "user_id")?,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_create_params(lumo: &Lumo) -> CreateLumoParams {
    CreateLumoParams {
        lumo_id: lumo.lumo_id.to_string(),
        user_id: lumo.user_id.to_string(),
        title: lumo.title.clone(),
        created_at: lumo.created_at,
        updated_at: lumo.updated_at,
    }
}

fn to_update_params(lumo: &Lumo) -> UpdateLumoParams {
    UpdateLumoParams {
        lumo_id: lumo.lumo_id.to_string(),
        title: lumo.title.clone(),
        updated_at: lumo.updated_at,
    }
}

#[async_trait]
impl LumoRepository for SqlLumoRepository {
    async fn create(&self, lumo: &Lumo) -> Result<Lumo> {
        db::create_lumo(&self.db, to_create_params(lumo)).await?.try_into()
    }

    async fn get(&self, id: RecordRef) -> Result<Lumo> {
        let row = match id {
            RecordRef::Internal(id) => db::get_lumo_by_id(&self.db, id).await?,
            RecordRef::External(lumo_id) => {
                db::get_lumo_by_lumo_id(&self.db, &lumo_id.to_string()).await?
            }
        };
        row.try_into()
    }

    async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Lumo>> {
        db::list_lumos_by_user_id(
            &self.db,
            &user_id.to_string(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?
        .into_iter()
        .map(Lumo::try_from)
        .collect()
    }

    async fn update(&self, lumo: &Lumo) -> Result<Lumo> {
        db::update_lumo(&self.db, to_update_params(lumo)).await?.try_into()
    }

    async fn delete(&self, id: RecordRef) -> Result<()> {
        match id {
            RecordRef::Internal(id) => db::delete_lumo(&self.db, id).await,
            RecordRef::External(lumo_id) => {
                db::delete_lumo_by_lumo_id(&self.db, &lumo_id.to_string()).await
            }
        }
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        db::count_lumos_by_user_id(&self.db, &user_id.to_string()).await
    }
}
