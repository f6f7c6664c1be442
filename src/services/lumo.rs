//! Lumo service.
//!
//! Validates requests, normalizes paging and resolves field masks before
//! handing records to the lumo repository.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{
    new_id, now, parse_external_id, resolve_mask, validate_title, Lumo, LumoChanges, LumoField,
    LumoUpdate, NewLumo, PageRequest, Paged, RecordRef, LUMO_PAGE_POLICY,
};
use crate::repository::LumoRepository;

/// Service for managing lumos.
#[derive(Clone)]
pub struct LumoService {
    repo: Arc<dyn LumoRepository>,
}

impl LumoService {
    pub fn new(repo: Arc<dyn LumoRepository>) -> Self {
        Self { repo }
    }

    /// Create a new lumo.
    pub async fn create(&self, input: NewLumo) -> Result<Lumo> {
        let user_id = parse_external_id(&input.user_id, "user_id")?;
        validate_title(&input.title)?;

        let timestamp = now();
        let lumo = Lumo {
            id: 0,
            lumo_id: new_id(),
            user_id,
            title: input.title,
            created_at: timestamp,
            updated_at: timestamp,
        };

        let created = self.repo.create(&lumo).await?;
        info!(lumo_id = %created.lumo_id, user_id = %created.user_id, "Created lumo");
        Ok(created)
    }

    /// Get a lumo by internal key or external id.
    pub async fn get(&self, id: &str) -> Result<Lumo> {
        let id = RecordRef::parse(id, "lumo id")?;
        self.repo.get(id).await
    }

    /// List the lumos of a user.
    pub async fn list(&self, user_id: &str, request: PageRequest) -> Result<Paged<Lumo>> {
        let user_id = parse_external_id(user_id, "user_id")?;
        let page = LUMO_PAGE_POLICY.normalize(request);

        let items = self.repo.list_by_user(user_id, page).await?;
        debug!(user_id = %user_id, count = items.len(), "Listed lumos");
        Ok(Paged { items, page })
    }

    /// Update a lumo. An empty mask replaces every mutable field.
    pub async fn update(&self, lumo_id: &str, candidate: LumoUpdate, mask: &[String]) -> Result<Lumo> {
        let lumo_id = parse_external_id(lumo_id, "lumo_id")?;
        let fields = resolve_mask::<LumoField>(mask);
        let changes = LumoChanges::resolve(candidate, &fields)?;

        let mut lumo = self.repo.get(RecordRef::External(lumo_id)).await?;
        changes.apply(&mut lumo);
        lumo.updated_at = now();

        let updated = self.repo.update(&lumo).await?;
        info!(lumo_id = %updated.lumo_id, fields = ?fields, "Updated lumo");
        Ok(updated)
    }

    /// Delete a lumo by internal key or external id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = RecordRef::parse(id, "lumo id")?;
        self.repo.delete(id).await?;
        info!(id = %id, "Deleted lumo");
        Ok(())
    }

    /// Count the lumos of a user.
    pub async fn count(&self, user_id: &str) -> Result<i64> {
        let user_id = parse_external_id(user_id, "user_id")?;
        self.repo.count_by_user(user_id).await
    }
}
