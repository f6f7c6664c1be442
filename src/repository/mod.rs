//! Entity repositories.
//!
//! Each entity has a repository trait used by its service and a SQLite
//! implementation over the `db` query functions. The implementations own
//! the translation between domain records and stored rows: external ids
//! as text, enums as their storage names, lists and travel details as
//! JSON.

mod link;
mod lume;
mod lumo;

pub use link::SqlLinkRepository;
pub use lume::SqlLumeRepository;
pub use lumo::SqlLumoRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    GeoBounds, Link, LinkType, Lume, LumeType, Lumo, Page, RecordRef,
};

#[async_trait]
pub trait LumoRepository: Send + Sync {
    async fn create(&self, lumo: &Lumo) -> Result<Lumo>;

    async fn get(&self, id: RecordRef) -> Result<Lumo>;

    async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Lumo>>;

    /// Persist every mutable field of `lumo`, keyed by its external id.
    async fn update(&self, lumo: &Lumo) -> Result<Lumo>;

    async fn delete(&self, id: RecordRef) -> Result<()>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait LumeRepository: Send + Sync {
    async fn create(&self, lume: &Lume) -> Result<Lume>;

    async fn get(&self, id: RecordRef) -> Result<Lume>;

    async fn list_by_lumo(&self, lumo_id: Uuid, page: Page) -> Result<Vec<Lume>>;

    async fn list_by_type(&self, lumo_id: Uuid, lume_type: LumeType, page: Page)
        -> Result<Vec<Lume>>;

    async fn search_by_location(
        &self,
        lumo_id: Uuid,
        bounds: GeoBounds,
        page: Page,
    ) -> Result<Vec<Lume>>;

    async fn update(&self, lume: &Lume) -> Result<Lume>;

    async fn delete(&self, id: RecordRef) -> Result<()>;

    async fn count_by_lumo(&self, lumo_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn create(&self, link: &Link) -> Result<Link>;

    async fn get(&self, id: RecordRef) -> Result<Link>;

    async fn list_from(&self, lume_id: Uuid, page: Page) -> Result<Vec<Link>>;

    async fn list_to(&self, lume_id: Uuid, page: Page) -> Result<Vec<Link>>;

    async fn list_for_lume(&self, lume_id: Uuid, page: Page) -> Result<Vec<Link>>;

    async fn list_between(&self, from: Uuid, to: Uuid, page: Page) -> Result<Vec<Link>>;

    async fn list_by_type(&self, link_type: LinkType, page: Page) -> Result<Vec<Link>>;

    async fn list_for_lume_by_type(
        &self,
        lume_id: Uuid,
        link_type: LinkType,
        page: Page,
    ) -> Result<Vec<Link>>;

    async fn update(&self, link: &Link) -> Result<Link>;

    async fn delete(&self, id: RecordRef) -> Result<()>;

    async fn count_for_lume(&self, lume_id: Uuid) -> Result<i64>;

    async fn count_from(&self, lume_id: Uuid) -> Result<i64>;

    async fn count_to(&self, lume_id: Uuid) -> Result<i64>;
}

/// Parse an id column back into an external id.
fn stored_id(raw: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("corrupt {} '{}': {}", column, raw, e)))
}

fn stored_list(raw: &str, column: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| Error::Internal(format!("corrupt {}: {}", column, e)))
}
