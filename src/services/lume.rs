//! Lume service.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{
    new_id, now, parse_external_id, resolve_mask, validate_date_range, GeoBounds, Lume,
    LumeChanges, LumeField, LumeFilter, LumeUpdate, NewLume, PageRequest, Paged, RecordRef,
    LUME_PAGE_POLICY,
};
use crate::repository::LumeRepository;

/// Service for managing lumes.
#[derive(Clone)]
pub struct LumeService {
    repo: Arc<dyn LumeRepository>,
}

impl LumeService {
    pub fn new(repo: Arc<dyn LumeRepository>) -> Self {
        Self { repo }
    }

    /// Create a new lume. Missing lists are stored empty.
    pub async fn create(&self, input: NewLume) -> Result<Lume> {
        let lumo_id = parse_external_id(&input.lumo_id, "lumo_id")?;
        input.validate()?;

        let timestamp = now();
        let lume = Lume {
            id: 0,
            lume_id: new_id(),
            lumo_id,
            lume_type: input.lume_type,
            name: input.name,
            description: input.description,
            date_start: input.date_start,
            date_end: input.date_end,
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address,
            booking_link: input.booking_link,
            images: input.images.unwrap_or_default(),
            category_tags: input.category_tags.unwrap_or_default(),
            created_at: timestamp,
            updated_at: timestamp,
        };

        let created = self.repo.create(&lume).await?;
        info!(
            lume_id = %created.lume_id,
            lumo_id = %created.lumo_id,
            lume_type = %created.lume_type,
            "Created lume"
        );
        Ok(created)
    }

    /// Get a lume by internal key or external id.
    pub async fn get(&self, id: &str) -> Result<Lume> {
        let id = RecordRef::parse(id, "lume id")?;
        self.repo.get(id).await
    }

    /// List the lumes of a lumo, optionally narrowed to one type.
    pub async fn list(&self, filter: LumeFilter, request: PageRequest) -> Result<Paged<Lume>> {
        let lumo_id = parse_external_id(&filter.lumo_id, "lumo_id")?;
        let page = LUME_PAGE_POLICY.normalize(request);

        let items = if filter.lume_type.is_specified() {
            self.repo.list_by_type(lumo_id, filter.lume_type, page).await?
        } else {
            self.repo.list_by_lumo(lumo_id, page).await?
        };
        debug!(lumo_id = %lumo_id, count = items.len(), "Listed lumes");
        Ok(Paged { items, page })
    }

    /// List the lumes of a lumo inside a bounding box.
    pub async fn search_by_location(
        &self,
        lumo_id: &str,
        bounds: GeoBounds,
        request: PageRequest,
    ) -> Result<Paged<Lume>> {
        let lumo_id = parse_external_id(lumo_id, "lumo_id")?;
        bounds.validate()?;
        let page = LUME_PAGE_POLICY.normalize(request);

        let items = self.repo.search_by_location(lumo_id, bounds, page).await?;
        debug!(lumo_id = %lumo_id, count = items.len(), "Searched lumes by location");
        Ok(Paged { items, page })
    }

    /// Update a lume. An empty mask replaces every mutable field.
    ///
    /// The date range is checked on the merged record, so a mask naming
    /// only one end is validated against the stored other end.
    pub async fn update(&self, lume_id: &str, candidate: LumeUpdate, mask: &[String]) -> Result<Lume> {
        let lume_id = parse_external_id(lume_id, "lume_id")?;
        let fields = resolve_mask::<LumeField>(mask);
        let changes = LumeChanges::resolve(candidate, &fields)?;

        let mut lume = self.repo.get(RecordRef::External(lume_id)).await?;
        changes.apply(&mut lume);
        validate_date_range(lume.date_start, lume.date_end)?;
        lume.updated_at = now();

        let updated = self.repo.update(&lume).await?;
        info!(lume_id = %updated.lume_id, fields = ?fields, "Updated lume");
        Ok(updated)
    }

    /// Delete a lume by internal key or external id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = RecordRef::parse(id, "lume id")?;
        self.repo.delete(id).await?;
        info!(id = %id, "Deleted lume");
        Ok(())
    }

    /// Count the lumes of a lumo.
    pub async fn count(&self, lumo_id: &str) -> Result<i64> {
        let lumo_id = parse_external_id(lumo_id, "lumo_id")?;
        self.repo.count_by_lumo(lumo_id).await
    }
}
