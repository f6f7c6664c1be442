//! Link service.
//!
//! Links are directional edges between lumes. Listing is anchored on one
//! or two lumes (see [`LinkSelector`]); self-links are allowed.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{
    new_id, now, parse_external_id, resolve_mask, Link, LinkChanges, LinkDraft, LinkField,
    LinkSelector, LinkType, PageRequest, Paged, RecordRef, LINK_PAGE_POLICY,
};
use crate::repository::LinkRepository;

/// Service for managing links.
#[derive(Clone)]
pub struct LinkService {
    repo: Arc<dyn LinkRepository>,
}

impl LinkService {
    pub fn new(repo: Arc<dyn LinkRepository>) -> Self {
        Self { repo }
    }

    /// Create a new link.
    pub async fn create(&self, draft: LinkDraft) -> Result<Link> {
        let valid = draft.validate()?;

        let timestamp = now();
        let link = Link {
            id: 0,
            link_id: new_id(),
            from_lume_id: valid.from_lume_id,
            to_lume_id: valid.to_lume_id,
            link_type: valid.link_type,
            travel: valid.travel,
            notes: valid.notes,
            sequence_index: valid.sequence_index,
            created_at: timestamp,
            updated_at: timestamp,
        };

        let created = self.repo.create(&link).await?;
        info!(
            link_id = %created.link_id,
            from = %created.from_lume_id,
            to = %created.to_lume_id,
            link_type = %created.link_type,
            "Created link"
        );
        Ok(created)
    }

    /// Get a link by internal key or external id.
    pub async fn get(&self, id: &str) -> Result<Link> {
        let id = RecordRef::parse(id, "link id")?;
        self.repo.get(id).await
    }

    /// List links matching a selector.
    pub async fn list(&self, selector: LinkSelector, request: PageRequest) -> Result<Paged<Link>> {
        let page = LINK_PAGE_POLICY.normalize(request);

        let items = match &selector {
            LinkSelector::Between { from, to } => {
                let from = parse_external_id(from, "from_lume_id")?;
                let to = parse_external_id(to, "to_lume_id")?;
                self.repo.list_between(from, to, page).await?
            }
            LinkSelector::From(lume_id) => {
                let lume_id = parse_external_id(lume_id, "from_lume_id")?;
                self.repo.list_from(lume_id, page).await?
            }
            LinkSelector::To(lume_id) => {
                let lume_id = parse_external_id(lume_id, "to_lume_id")?;
                self.repo.list_to(lume_id, page).await?
            }
            LinkSelector::Lume {
                lume_id,
                link_type: None,
            } => {
                let lume_id = parse_external_id(lume_id, "lume_id")?;
                self.repo.list_for_lume(lume_id, page).await?
            }
            LinkSelector::Lume {
                lume_id,
                link_type: Some(link_type),
            } => {
                let lume_id = parse_external_id(lume_id, "lume_id")?;
                require_type_filter(*link_type)?;
                self.repo.list_for_lume_by_type(lume_id, *link_type, page).await?
            }
            LinkSelector::Type(link_type) => {
                require_type_filter(*link_type)?;
                self.repo.list_by_type(*link_type, page).await?
            }
        };

        debug!(selector = ?selector, count = items.len(), "Listed links");
        Ok(Paged { items, page })
    }

    /// Update a link. An empty mask applies every field, but travel, notes
    /// and sequence index are only replaced when the candidate has them.
    pub async fn update(&self, link_id: &str, candidate: LinkDraft, mask: &[String]) -> Result<Link> {
        let link_id = parse_external_id(link_id, "link_id")?;
        let fields = resolve_mask::<LinkField>(mask);
        let changes = LinkChanges::resolve(candidate, &fields)?;

        let mut link = self.repo.get(RecordRef::External(link_id)).await?;
        changes.apply(&mut link);
        link.updated_at = now();

        let updated = self.repo.update(&link).await?;
        info!(link_id = %updated.link_id, fields = ?fields, "Updated link");
        Ok(updated)
    }

    /// Delete a link by internal key or external id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = RecordRef::parse(id, "link id")?;
        self.repo.delete(id).await?;
        info!(id = %id, "Deleted link");
        Ok(())
    }

    /// Count links anchored on a single lume.
    pub async fn count(&self, selector: LinkSelector) -> Result<i64> {
        match selector {
            LinkSelector::From(lume_id) => {
                let lume_id = parse_external_id(&lume_id, "from_lume_id")?;
                self.repo.count_from(lume_id).await
            }
            LinkSelector::To(lume_id) => {
                let lume_id = parse_external_id(&lume_id, "to_lume_id")?;
                self.repo.count_to(lume_id).await
            }
            LinkSelector::Lume {
                lume_id,
                link_type: None,
            } => {
                let lume_id = parse_external_id(&lume_id, "lume_id")?;
                self.repo.count_for_lume(lume_id).await
            }
            other => Err(Error::Unimplemented(format!(
                "counting links by {:?} is not supported",
                other
            ))),
        }
    }
}

fn require_type_filter(link_type: LinkType) -> Result<()> {
    if !link_type.is_specified() {
        return Err(Error::InvalidArgument(
            "link type filter must not be unspecified".to_string(),
        ));
    }
    Ok(())
}
