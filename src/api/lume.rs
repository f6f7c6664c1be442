//! Lume RPC routes.
//!
//! Routes (all POST, nested under /lume.v1.LumeService):
//! - /CreateLume - Create a lume inside a lumo
//! - /GetLume - Get a lume by internal key or external id
//! - /ListLumes - List a lumo's lumes, optionally by type
//! - /SearchLumesByLocation - List a lumo's lumes inside a bounding box
//! - /UpdateLume - Update a lume (optional field mask)
//! - /DeleteLume - Delete a lume by internal key or external id
//! - /CountLumes - Count a lumo's lumes

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rpc::{next_page_token, page_request, Rpc};
use crate::models::{GeoBounds, Lume, LumeFilter, LumeType, LumeUpdate, NewLume};
use crate::{AppState, Result};

/// Build lume routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/CreateLume", post(create_lume))
        .route("/GetLume", post(get_lume))
        .route("/ListLumes", post(list_lumes))
        .route("/SearchLumesByLocation", post(search_lumes_by_location))
        .route("/UpdateLume", post(update_lume))
        .route("/DeleteLume", post(delete_lume))
        .route("/CountLumes", post(count_lumes))
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LumeMessage {
    pub id: i64,
    pub lume_id: String,
    pub lumo_id: String,
    #[serde(rename = "type")]
    pub lume_type: LumeType,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub images: Vec<String>,
    pub category_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lume> for LumeMessage {
    fn from(lume: Lume) -> Self {
        Self {
            id: lume.id,
            lume_id: lume.lume_id.to_string(),
            lumo_id: lume.lumo_id.to_string(),
            lume_type: lume.lume_type,
            name: lume.name,
            description: lume.description,
            date_start: lume.date_start,
            date_end: lume.date_end,
            latitude: lume.latitude,
            longitude: lume.longitude,
            address: lume.address,
            images: lume.images,
            category_tags: lume.category_tags,
            booking_link: lume.booking_link,
            created_at: lume.created_at,
            updated_at: lume.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLumeRequest {
    pub lumo_id: String,
    #[serde(rename = "type")]
    pub lume_type: LumeType,
    pub name: String,
    pub description: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_tags: Option<Vec<String>>,
    pub booking_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetLumeRequest {
    /// Internal key or external id
    pub lume_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListLumesRequest {
    pub lumo_id: String,
    /// Unspecified lists every type
    #[serde(rename = "type")]
    pub lume_type: LumeType,
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchLumesByLocationRequest {
    pub lumo_id: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLumeRequest {
    pub lume_id: String,
    #[serde(rename = "type")]
    pub lume_type: LumeType,
    pub name: String,
    pub description: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_tags: Option<Vec<String>>,
    pub booking_link: Option<String>,
    pub update_mask: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteLumeRequest {
    pub lume_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountLumesRequest {
    pub lumo_id: String,
}

#[derive(Debug, Serialize)]
pub struct LumeResponse {
    pub lume: LumeMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLumesResponse {
    pub lumes: Vec<LumeMessage>,
    pub next_page_token: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteLumeResponse {}

#[derive(Debug, Serialize)]
pub struct CountLumesResponse {
    pub count: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /lume.v1.LumeService/CreateLume
#[axum::debug_handler]
async fn create_lume(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<CreateLumeRequest>,
) -> Result<Json<LumeResponse>> {
    let created = state
        .lumes
        .create(NewLume {
            lumo_id: request.lumo_id,
            lume_type: request.lume_type,
            name: request.name,
            description: request.description,
            date_start: request.date_start,
            date_end: request.date_end,
            latitude: request.latitude,
            longitude: request.longitude,
            address: request.address,
            booking_link: request.booking_link,
            images: request.images,
            category_tags: request.category_tags,
        })
        .await?;

    Ok(Json(LumeResponse {
        lume: created.into(),
    }))
}

/// POST /lume.v1.LumeService/GetLume
#[axum::debug_handler]
async fn get_lume(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<GetLumeRequest>,
) -> Result<Json<LumeResponse>> {
    let lume = state.lumes.get(&request.lume_id).await?;
    Ok(Json(LumeResponse { lume: lume.into() }))
}

/// POST /lume.v1.LumeService/ListLumes
#[axum::debug_handler]
async fn list_lumes(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<ListLumesRequest>,
) -> Result<Json<ListLumesResponse>> {
    let page = page_request(request.page_size, &request.page_token)?;
    let filter = LumeFilter {
        lumo_id: request.lumo_id,
        lume_type: request.lume_type,
    };
    let paged = state.lumes.list(filter, page).await?;
    let next_page_token = next_page_token(&paged);

    Ok(Json(ListLumesResponse {
        lumes: paged.items.into_iter().map(LumeMessage::from).collect(),
        next_page_token,
    }))
}

/// POST /lume.v1.LumeService/SearchLumesByLocation
#[axum::debug_handler]
async fn search_lumes_by_location(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<SearchLumesByLocationRequest>,
) -> Result<Json<ListLumesResponse>> {
    let page = page_request(request.page_size, &request.page_token)?;
    let bounds = GeoBounds {
        min_lat: request.min_lat,
        max_lat: request.max_lat,
        min_lng: request.min_lng,
        max_lng: request.max_lng,
    };
    let paged = state
        .lumes
        .search_by_location(&request.lumo_id, bounds, page)
        .await?;
    let next_page_token = next_page_token(&paged);

    Ok(Json(ListLumesResponse {
        lumes: paged.items.into_iter().map(LumeMessage::from).collect(),
        next_page_token,
    }))
}

/// POST /lume.v1.LumeService/UpdateLume
///
/// With an empty `updateMask` every mutable field is replaced. Optional
/// scalars missing from the request are cleared; `images` and
/// `categoryTags` are kept unless present.
#[axum::debug_handler]
async fn update_lume(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<UpdateLumeRequest>,
) -> Result<Json<LumeResponse>> {
    let candidate = LumeUpdate {
        lume_type: request.lume_type,
        name: request.name,
        description: request.description,
        date_start: request.date_start,
        date_end: request.date_end,
        latitude: request.latitude,
        longitude: request.longitude,
        address: request.address,
        booking_link: request.booking_link,
        images: request.images,
        category_tags: request.category_tags,
    };

    let updated = state
        .lumes
        .update(&request.lume_id, candidate, &request.update_mask)
        .await?;

    Ok(Json(LumeResponse {
        lume: updated.into(),
    }))
}

/// POST /lume.v1.LumeService/DeleteLume
#[axum::debug_handler]
async fn delete_lume(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<DeleteLumeRequest>,
) -> Result<Json<DeleteLumeResponse>> {
    state.lumes.delete(&request.lume_id).await?;
    Ok(Json(DeleteLumeResponse {}))
}

/// POST /lume.v1.LumeService/CountLumes
#[axum::debug_handler]
async fn count_lumes(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<CountLumesRequest>,
) -> Result<Json<CountLumesResponse>> {
    let count = state.lumes.count(&request.lumo_id).await?;
    Ok(Json(CountLumesResponse { count }))
}
