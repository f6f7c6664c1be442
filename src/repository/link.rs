use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{stored_id, LinkRepository};
use crate::db::{self, CreateLinkParams, DbPool, LinkRow, UpdateLinkParams};
use crate::error::{Error, Result};
use crate::models::{Link, LinkType, Page, RecordRef, TravelDetails, TravelMode};

/// Link repository backed by SQLite.
#[derive(Clone)]
pub struct SqlLinkRepository {
    db: DbPool,
}

impl SqlLinkRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

/// JSON shape of the `travel_details` column.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTravel {
    mode: String,
    #[serde(default)]
    duration_sec: i32,
    #[serde(default)]
    cost_estimate: f64,
    #[serde(default)]
    distance_meters: f64,
}

fn encode_travel(travel: Option<&TravelDetails>) -> Result<Option<String>> {
    travel
        .map(|t| {
            serde_json::to_string(&StoredTravel {
                mode: t.mode.as_str().to_string(),
                duration_sec: t.duration_sec,
                cost_estimate: t.cost_estimate,
                distance_meters: t.distance_meters,
            })
            .map_err(Error::from)
        })
        .transpose()
}

fn decode_travel(raw: Option<&str>) -> Result<Option<TravelDetails>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let stored: StoredTravel = serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("corrupt travel_details: {}", e)))?;
    let mode = TravelMode::from_str(&stored.mode)
        .ok_or_else(|| Error::Internal(format!("unknown travel mode '{}'", stored.mode)))?;

    Ok(Some(TravelDetails {
        mode,
        duration_sec: stored.duration_sec,
        cost_estimate: stored.cost_estimate,
        distance_meters: stored.distance_meters,
    }))
}

impl TryFrom<LinkRow> for Link {
    type Error = crate::Error;

    fn try_from(row: LinkRow) -> Result<Self> {
        let link_type = LinkType::from_str(&row.link_type)
            .ok_or_else(|| Error::Internal(format!("unknown link type '{}'", row.link_type)))?;

        Ok(Self {
            id: row.id,
            link_id: stored_id(&row.link_id, "link_id")?,
            from_lume_id: stored_id(&row.from_lume_id, "from_lume_id")?,
            to_lume_id: stored_id(&row.to_lume_id, "to_lume_id")?,
            link_type,
            travel: decode_travel(row.travel_details.as_deref())?,
            notes: row.notes,
            sequence_index: row.sequence_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_create_params(link: &Link) -> Result<CreateLinkParams> {
    Ok(CreateLinkParams {
        link_id: link.link_id.to_string(),
        from_lume_id: link.from_lume_id.to_string(),
        to_lume_id: link.to_lume_id.to_string(),
        link_type: link.link_type.as_str().to_string(),
        travel_details: encode_travel(link.travel.as_ref())?,
        notes: link.notes.clone(),
        sequence_index: link.sequence_index,
        created_at: link.created_at,
        updated_at: link.updated_at,
    })
}

fn to_update_params(link: &Link) -> Result<UpdateLinkParams> {
    Ok(UpdateLinkParams {
        link_id: link.link_id.to_string(),
        from_lume_id: link.from_lume_id.to_string(),
        to_lume_id: link.to_lume_id.to_string(),
        link_type: link.link_type.as_str().to_string(),
        travel_details: encode_travel(link.travel.as_ref())?,
        notes: link.notes.clone(),
        sequence_index: link.sequence_index,
        updated_at: link.updated_at,
    })
}

fn into_links(rows: Vec<LinkRow>) -> Result<Vec<Link>> {
    rows.into_iter().map(Link::try_from).collect()
}

#[async_trait]
impl LinkRepository for SqlLinkRepository {
    async fn create(&self, link: &Link) -> Result<Link> {
        db::create_link(&self.db, to_create_params(link)?).await?.try_into()
    }

    async fn get(&self, id: RecordRef) -> Result<Link> {
        let row = match id {
            RecordRef::Internal(id) => db::get_link_by_id(&self.db, id).await?,
            RecordRef::External(link_id) => {
                db::get_link_by_link_id(&self.db, &link_id.to_string()).await?
            }
        };
        row.try_into()
    }

    async fn list_from(&self, lume_id: Uuid, page: Page) -> Result<Vec<Link>> {
        let rows = db::list_links_from_lume(
            &self.db,
            &lume_id.to_string(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_links(rows)
    }

    async fn list_to(&self, lume_id: Uuid, page: Page) -> Result<Vec<Link>> {
        let rows = db::list_links_to_lume(
            &self.db,
            &lume_id.to_string(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_links(rows)
    }

    async fn list_for_lume(&self, lume_id: Uuid, page: Page) -> Result<Vec<Link>> {
        let rows = db::list_links_for_lume(
            &self.db,
            &lume_id.to_string(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_links(rows)
    }

    async fn list_between(&self, from: Uuid, to: Uuid, page: Page) -> Result<Vec<Link>> {
        let rows = db::list_links_between(
            &self.db,
            &from.to_string(),
            &to.to_string(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_links(rows)
    }

    async fn list_by_type(&self, link_type: LinkType, page: Page) -> Result<Vec<Link>> {
        let rows = db::list_links_by_type(
            &self.db,
            link_type.as_str(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_links(rows)
    }

    async fn list_for_lume_by_type(
        &self,
        lume_id: Uuid,
        link_type: LinkType,
        page: Page,
    ) -> Result<Vec<Link>> {
        let rows = db::list_links_for_lume_by_type(
            &self.db,
            &lume_id.to_string(),
            link_type.as_str(),
            page.limit as i64,
            page.offset as i64,
        )
        .await?;
        into_links(rows)
    }

    async fn update(&self, link: &Link) -> Result<Link> {
        db::update_link(&self.db, to_update_params(link)?).await?.try_into()
    }

    async fn delete(&self, id: RecordRef) -> Result<()> {
        match id {
            RecordRef::Internal(id) => db::delete_link(&self.db, id).await,
            RecordRef::External(link_id) => {
                db::delete_link_by_link_id(&self.db, &link_id.to_string()).await
            }
        }
    }

    async fn count_for_lume(&self, lume_id: Uuid) -> Result<i64> {
        db::count_links_for_lume(&self.db, &lume_id.to_string()).await
    }

    async fn count_from(&self, lume_id: Uuid) -> Result<i64> {
        db::count_links_from_lume(&self.db, &lume_id.to_string()).await
    }

    async fn count_to(&self, lume_id: Uuid) -> Result<i64> {
        db::count_links_to_lume(&self.db, &lume_id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_travel_column_shape() {
        let travel = TravelDetails {
            mode: TravelMode::Flight,
            duration_sec: 7200,
            cost_estimate: 350.5,
            distance_meters: 1_200_000.0,
        };
        let raw = encode_travel(Some(&travel)).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["mode"], "FLIGHT");
        assert_eq!(value["duration_sec"], 7200);

        assert_eq!(decode_travel(Some(&raw)).unwrap(), Some(travel));
        assert_eq!(encode_travel(None).unwrap(), None);
        assert_eq!(decode_travel(None).unwrap(), None);
    }

    #[test]
    fn test_corrupt_travel_is_internal() {
        let err = decode_travel(Some(r#"{"mode":"HOVERCRAFT"}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let err = decode_travel(Some("not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
