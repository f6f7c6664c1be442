//! Link RPC routes.
//!
//! Routes (all POST, nested under /link.v1.LinkService):
//! - /CreateLink - Create a link between two lumes
//! - /GetLink - Get a link by internal key or external id
//! - /ListLinks - List links by endpoint lumes
//! - /UpdateLink - Update a link (optional field mask)
//! - /DeleteLink - Delete a link by internal key or external id
//! - /CountLinks - Count links touching one lume

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rpc::{next_page_token, non_empty, page_request, Rpc};
use crate::models::{Link, LinkDraft, LinkSelector, LinkType, TravelDetails, TravelMode};
use crate::{AppState, Error, Result};

/// Build link routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/CreateLink", post(create_link))
        .route("/GetLink", post(get_link))
        .route("/ListLinks", post(list_links))
        .route("/UpdateLink", post(update_link))
        .route("/DeleteLink", post(delete_link))
        .route("/CountLinks", post(count_links))
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelDetailsMessage {
    pub mode: TravelMode,
    pub duration_sec: i32,
    pub cost_estimate: f64,
    pub distance_meters: f64,
}

impl From<TravelDetails> for TravelDetailsMessage {
    fn from(travel: TravelDetails) -> Self {
        Self {
            mode: travel.mode,
            duration_sec: travel.duration_sec,
            cost_estimate: travel.cost_estimate,
            distance_meters: travel.distance_meters,
        }
    }
}

impl From<TravelDetailsMessage> for TravelDetails {
    fn from(message: TravelDetailsMessage) -> Self {
        Self {
            mode: message.mode,
            duration_sec: message.duration_sec,
            cost_estimate: message.cost_estimate,
            distance_meters: message.distance_meters,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkMessage {
    /// Internal key, output only
    pub id: i64,
    pub link_id: String,
    pub from_lume_id: String,
    pub to_lume_id: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel: Option<TravelDetailsMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_index: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkMessage {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            link_id: link.link_id.to_string(),
            from_lume_id: link.from_lume_id.to_string(),
            to_lume_id: link.to_lume_id.to_string(),
            link_type: link.link_type,
            travel: link.travel.map(TravelDetailsMessage::from),
            notes: link.notes,
            sequence_index: link.sequence_index,
            created_at: Some(link.created_at),
            updated_at: Some(link.updated_at),
        }
    }
}

impl From<LinkMessage> for LinkDraft {
    fn from(message: LinkMessage) -> Self {
        Self {
            from_lume_id: message.from_lume_id,
            to_lume_id: message.to_lume_id,
            link_type: message.link_type,
            travel: message.travel.map(TravelDetails::from),
            notes: message.notes,
            sequence_index: message.sequence_index,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLinkRequest {
    pub link: Option<LinkMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetLinkRequest {
    pub link_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListLinksRequest {
    pub from_lume_id: String,
    pub to_lume_id: String,
    /// Either direction
    pub lume_id: String,
    pub lumo_uuid: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLinkRequest {
    pub link: Option<LinkMessage>,
    pub update_mask: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteLinkRequest {
    pub link_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountLinksRequest {
    pub lume_id: String,
    pub from_lume_id: String,
    pub to_lume_id: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub link: LinkMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinksResponse {
    pub links: Vec<LinkMessage>,
    pub next_page_token: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {}

#[derive(Debug, Serialize)]
pub struct CountLinksResponse {
    pub count: i64,
}

// ============================================================================
// Filter dispatch
// ============================================================================

impl ListLinksRequest {
    /// Pick the listing from the populated filters.
    ///
    /// from + to > from > to > lumeId > type alone. A lumo filter is not
    /// supported and no filter at all is rejected.
    fn selector(&self) -> Result<LinkSelector> {
        let from = non_empty(&self.from_lume_id);
        let to = non_empty(&self.to_lume_id);
        let lume = non_empty(&self.lume_id);
        let typed = self.link_type.is_specified().then_some(self.link_type);

        if typed.is_some() && (from.is_some() || to.is_some()) {
            return Err(Error::InvalidArgument(
                "type filter cannot be combined with fromLumeId or toLumeId".to_string(),
            ));
        }

        match (from, to, lume) {
            (Some(from), Some(to), _) => Ok(LinkSelector::Between {
                from: from.to_string(),
                to: to.to_string(),
            }),
            (Some(from), None, _) => Ok(LinkSelector::From(from.to_string())),
            (None, Some(to), _) => Ok(LinkSelector::To(to.to_string())),
            (None, None, Some(lume)) => Ok(LinkSelector::Lume {
                lume_id: lume.to_string(),
                link_type: typed,
            }),
            (None, None, None) => {
                if non_empty(&self.lumo_uuid).is_some() {
                    return Err(Error::Unimplemented(
                        "filtering links by lumo is not implemented".to_string(),
                    ));
                }
                match typed {
                    Some(link_type) => Ok(LinkSelector::Type(link_type)),
                    None => Err(Error::InvalidArgument(
                        "at least one filter is required".to_string(),
                    )),
                }
            }
        }
    }
}

impl CountLinksRequest {
    fn selector(&self) -> Result<LinkSelector> {
        let lume = non_empty(&self.lume_id);
        let from = non_empty(&self.from_lume_id);
        let to = non_empty(&self.to_lume_id);

        match (lume, from, to) {
            (Some(lume), None, None) => Ok(LinkSelector::Lume {
                lume_id: lume.to_string(),
                link_type: None,
            }),
            (None, Some(from), None) => Ok(LinkSelector::From(from.to_string())),
            (None, None, Some(to)) => Ok(LinkSelector::To(to.to_string())),
            _ => Err(Error::InvalidArgument(
                "exactly one of lumeId, fromLumeId or toLumeId is required".to_string(),
            )),
        }
    }
}

fn required_link(link: Option<LinkMessage>) -> Result<LinkMessage> {
    link.ok_or_else(|| Error::InvalidArgument("link is required".to_string()))
}

fn required_link_id(link_id: &str) -> Result<&str> {
    non_empty(link_id).ok_or_else(|| Error::InvalidArgument("link_id is required".to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /link.v1.LinkService/CreateLink
#[axum::debug_handler]
async fn create_link(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<CreateLinkRequest>,
) -> Result<Json<LinkResponse>> {
    let link = required_link(request.link)?;
    let created = state.links.create(link.into()).await?;

    Ok(Json(LinkResponse {
        link: created.into(),
    }))
}

/// POST /link.v1.LinkService/GetLink
#[axum::debug_handler]
async fn get_link(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<GetLinkRequest>,
) -> Result<Json<LinkResponse>> {
    let link_id = required_link_id(&request.link_id)?;
    let link = state.links.get(link_id).await?;
    Ok(Json(LinkResponse { link: link.into() }))
}

/// POST /link.v1.LinkService/ListLinks
#[axum::debug_handler]
async fn list_links(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<ListLinksRequest>,
) -> Result<Json<ListLinksResponse>> {
    let page = page_request(request.page_size, &request.page_token)?;
    let selector = request.selector()?;
    let paged = state.links.list(selector, page).await?;
    let next_page_token = next_page_token(&paged);

    Ok(Json(ListLinksResponse {
        links: paged.items.into_iter().map(LinkMessage::from).collect(),
        next_page_token,
    }))
}

/// POST /link.v1.LinkService/UpdateLink
///
/// The target is `link.linkId`. `travel`, `notes` and `sequenceIndex` are
/// only replaced when present, with or without a mask.
#[axum::debug_handler]
async fn update_link(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>> {
    let link = required_link(request.link)?;
    let link_id = required_link_id(&link.link_id)?.to_string();

    let updated = state
        .links
        .update(&link_id, link.into(), &request.update_mask)
        .await?;

    Ok(Json(LinkResponse {
        link: updated.into(),
    }))
}

/// POST /link.v1.LinkService/DeleteLink
#[axum::debug_handler]
async fn delete_link(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<DeleteLinkRequest>,
) -> Result<Json<DeleteLinkResponse>> {
    let link_id = required_link_id(&request.link_id)?;
    state.links.delete(link_id).await?;
    Ok(Json(DeleteLinkResponse {}))
}

/// POST /link.v1.LinkService/CountLinks
#[axum::debug_handler]
async fn count_links(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<CountLinksRequest>,
) -> Result<Json<CountLinksResponse>> {
    let count = state.links.count(request.selector()?).await?;
    Ok(Json(CountLinksResponse { count }))
}
