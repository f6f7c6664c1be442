//! Lumo RPC routes.
//!
//! Routes (all POST, nested under /lumo.v1.LumoService):
//! - /CreateLumo - Create a lumo for a user
//! - /GetLumo - Get a lumo by internal key or external id
//! - /ListLumos - List a user's lumos
//! - /UpdateLumo - Update a lumo (optional field mask)
//! - /DeleteLumo - Delete a lumo by internal key or external id
//! - /CountLumos - Count a user's lumos

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rpc::{next_page_token, page_request, Rpc};
use crate::models::{Lumo, LumoUpdate, NewLumo};
use crate::{AppState, Error, Result};

/// Build lumo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/CreateLumo", post(create_lumo))
        .route("/GetLumo", post(get_lumo))
        .route("/ListLumos", post(list_lumos))
        .route("/UpdateLumo", post(update_lumo))
        .route("/DeleteLumo", post(delete_lumo))
        .route("/CountLumos", post(count_lumos))
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LumoMessage {
    /// Internal key, output only
    pub id: i64,
    pub lumo_id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Lumo> for LumoMessage {
    fn from(lumo: Lumo) -> Self {
        Self {
            id: lumo.id,
            lumo_id: lumo.lumo_id.to_string(),
            user_id: lumo.user_id.to_string(),
            title: lumo.title,
            created_at: Some(lumo.created_at),
            updated_at: Some(lumo.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLumoRequest {
    pub lumo: Option<LumoMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetLumoRequest {
    /// Internal key or external id
    pub uuid: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListLumosRequest {
    pub user_id: String,
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLumoRequest {
    pub lumo: Option<LumoMessage>,
    pub update_mask: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteLumoRequest {
    pub uuid: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountLumosRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LumoResponse {
    pub lumo: LumoMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLumosResponse {
    pub lumos: Vec<LumoMessage>,
    pub next_page_token: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteLumoResponse {}

#[derive(Debug, Serialize)]
pub struct CountLumosResponse {
    pub count: i64,
}

// ============================================================================
// Handlers
// ============================================================================

fn required_lumo(lumo: Option<LumoMessage>) -> Result<LumoMessage> {
    lumo.ok_or_else(|| Error::InvalidArgument("lumo is required".to_string()))
}

/// POST /lumo.v1.LumoService/CreateLumo
#[axum::debug_handler]
async fn create_lumo(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<CreateLumoRequest>,
) -> Result<Json<LumoResponse>> {
    let lumo = required_lumo(request.lumo)?;

    let created = state
        .lumos
        .create(NewLumo {
            user_id: lumo.user_id,
            title: lumo.title,
        })
        .await?;

    Ok(Json(LumoResponse {
        lumo: created.into(),
    }))
}

/// POST /lumo.v1.LumoService/GetLumo
#[axum::debug_handler]
async fn get_lumo(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<GetLumoRequest>,
) -> Result<Json<LumoResponse>> {
    let lumo = state.lumos.get(&request.uuid).await?;
    Ok(Json(LumoResponse { lumo: lumo.into() }))
}

/// POST /lumo.v1.LumoService/ListLumos
#[axum::debug_handler]
async fn list_lumos(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<ListLumosRequest>,
) -> Result<Json<ListLumosResponse>> {
    let page = page_request(request.page_size, &request.page_token)?;
    let paged = state.lumos.list(&request.user_id, page).await?;
    let next_page_token = next_page_token(&paged);

    Ok(Json(ListLumosResponse {
        lumos: paged.items.into_iter().map(LumoMessage::from).collect(),
        next_page_token,
    }))
}

/// POST /lumo.v1.LumoService/UpdateLumo
///
/// The target is `lumo.lumoId`. With an empty `updateMask` every mutable
/// field is replaced.
#[axum::debug_handler]
async fn update_lumo(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<UpdateLumoRequest>,
) -> Result<Json<LumoResponse>> {
    let lumo = required_lumo(request.lumo)?;

    let updated = state
        .lumos
        .update(
            &lumo.lumo_id,
            LumoUpdate { title: lumo.title },
            &request.update_mask,
        )
        .await?;

    Ok(Json(LumoResponse {
        lumo: updated.into(),
    }))
}

/// POST /lumo.v1.LumoService/DeleteLumo
#[axum::debug_handler]
async fn delete_lumo(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<DeleteLumoRequest>,
) -> Result<Json<DeleteLumoResponse>> {
    state.lumos.delete(&request.uuid).await?;
    Ok(Json(DeleteLumoResponse {}))
}

/// POST /lumo.v1.LumoService/CountLumos
#[axum::debug_handler]
async fn count_lumos(
    State(state): State<AppState>,
    WithRejection(Json(request), _): Rpc<CountLumosRequest>,
) -> Result<Json<CountLumosResponse>> {
    let count = state.lumos.count(&request.user_id).await?;
    Ok(Json(CountLumosResponse { count }))
}
