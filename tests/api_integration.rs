//! API Integration Tests for the Lumo server
//!
//! Exercises the Connect-style JSON routes using axum-test over an
//! in-memory SQLite database.

mod common;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use common::{build_test_app, OWNER};
use serde_json::{json, Value};

// ============================================================================
// Helpers
// ============================================================================

async fn create_lumo(server: &TestServer, title: &str) -> Value {
    let response = server
        .post("/lumo.v1.LumoService/CreateLumo")
        .json(&json!({ "lumo": { "userId": OWNER, "title": title } }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["lumo"].clone()
}

async fn create_lume(server: &TestServer, lumo_id: &str, name: &str) -> Value {
    let response = server
        .post("/lume.v1.LumeService/CreateLume")
        .json(&json!({
            "lumoId": lumo_id,
            "type": "LUME_TYPE_CITY",
            "name": name,
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["lume"].clone()
}

async fn create_link(server: &TestServer, from: &str, to: &str, link_type: &str) -> Value {
    let response = server
        .post("/link.v1.LinkService/CreateLink")
        .json(&json!({
            "link": { "fromLumeId": from, "toLumeId": to, "type": link_type }
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["link"].clone()
}

async fn list_links(server: &TestServer, body: Value) -> TestResponse {
    server.post("/link.v1.LinkService/ListLinks").json(&body).await
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (server, _) = build_test_app().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["database"]["connected"], true);
}

// ============================================================================
// Lumo
// ============================================================================

#[tokio::test]
async fn test_create_lumo() {
    let (server, _) = build_test_app().await;

    let lumo = create_lumo(&server, "Japan Trip").await;

    assert_eq!(lumo["title"], "Japan Trip");
    assert_eq!(lumo["userId"], OWNER);
    assert!(lumo["id"].as_i64().unwrap() > 0);
    assert!(uuid::Uuid::parse_str(str_field(&lumo, "lumoId")).is_ok());
    assert_eq!(lumo["createdAt"], lumo["updatedAt"]);
}

#[tokio::test]
async fn test_create_lumo_without_body_message() {
    let (server, _) = build_test_app().await;

    let response = server
        .post("/lumo.v1.LumoService/CreateLumo")
        .json(&json!({}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_argument");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_argument() {
    let (server, _) = build_test_app().await;

    let response = server
        .post("/lumo.v1.LumoService/CreateLumo")
        .text("{ \"lumo\": ")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_argument");
}

#[tokio::test]
async fn test_update_lumo_with_empty_title_is_rejected() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;

    let response = server
        .post("/lumo.v1.LumoService/UpdateLumo")
        .json(&json!({ "lumo": { "lumoId": lumo["lumoId"], "title": "" } }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_argument");
}

#[tokio::test]
async fn test_update_lumo_title() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;

    let response = server
        .post("/lumo.v1.LumoService/UpdateLumo")
        .json(&json!({
            "lumo": { "lumoId": lumo["lumoId"], "title": "Japan & Korea" },
            "updateMask": ["title"],
        }))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>()["lumo"].clone();
    assert_eq!(updated["title"], "Japan & Korea");
    assert_eq!(updated["createdAt"], lumo["createdAt"]);
}

#[tokio::test]
async fn test_get_lumo_by_internal_key_and_external_id() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;

    let by_key = server
        .post("/lumo.v1.LumoService/GetLumo")
        .json(&json!({ "uuid": lumo["id"].to_string() }))
        .await;
    by_key.assert_status_ok();
    assert_eq!(by_key.json::<Value>()["lumo"], lumo);

    let by_id = server
        .post("/lumo.v1.LumoService/GetLumo")
        .json(&json!({ "uuid": lumo["lumoId"] }))
        .await;
    by_id.assert_status_ok();
    assert_eq!(by_id.json::<Value>()["lumo"], lumo);
}

#[tokio::test]
async fn test_get_lumo_errors() {
    let (server, _) = build_test_app().await;

    let missing = server
        .post("/lumo.v1.LumoService/GetLumo")
        .json(&json!({ "uuid": uuid::Uuid::new_v4().to_string() }))
        .await;
    missing.assert_status_not_found();
    assert_eq!(missing.json::<Value>()["code"], "not_found");

    let malformed = server
        .post("/lumo.v1.LumoService/GetLumo")
        .json(&json!({ "uuid": "not-an-id" }))
        .await;
    malformed.assert_status_bad_request();
}

#[tokio::test]
async fn test_list_lumos_paging() {
    let (server, _) = build_test_app().await;
    for i in 0..3 {
        create_lumo(&server, &format!("Trip {}", i)).await;
    }

    let response = server
        .post("/lumo.v1.LumoService/ListLumos")
        .json(&json!({ "userId": OWNER, "pageSize": 0 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["lumos"].as_array().unwrap().len(), 3);
    assert_eq!(body["nextPageToken"], "");

    let first = server
        .post("/lumo.v1.LumoService/ListLumos")
        .json(&json!({ "userId": OWNER, "pageSize": 2 }))
        .await
        .json::<Value>();
    assert_eq!(first["lumos"].as_array().unwrap().len(), 2);
    assert_eq!(first["nextPageToken"], "2");

    let second = server
        .post("/lumo.v1.LumoService/ListLumos")
        .json(&json!({ "userId": OWNER, "pageSize": 2, "pageToken": "2" }))
        .await
        .json::<Value>();
    assert_eq!(second["lumos"].as_array().unwrap().len(), 1);
    assert_eq!(second["nextPageToken"], "");
}

#[tokio::test]
async fn test_delete_and_count_lumos() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;
    create_lumo(&server, "Iceland").await;

    let count = server
        .post("/lumo.v1.LumoService/CountLumos")
        .json(&json!({ "userId": OWNER }))
        .await
        .json::<Value>();
    assert_eq!(count["count"], 2);

    let response = server
        .post("/lumo.v1.LumoService/DeleteLumo")
        .json(&json!({ "uuid": lumo["lumoId"] }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({}));

    let again = server
        .post("/lumo.v1.LumoService/DeleteLumo")
        .json(&json!({ "uuid": lumo["lumoId"] }))
        .await;
    again.assert_status_not_found();
}

// ============================================================================
// Lume
// ============================================================================

#[tokio::test]
async fn test_create_and_update_lume() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;
    let lume = create_lume(&server, str_field(&lumo, "lumoId"), "Tokyo").await;

    assert_eq!(lume["type"], "LUME_TYPE_CITY");
    assert_eq!(lume["images"], json!([]));
    assert!(lume.get("latitude").is_none());

    let response = server
        .post("/lume.v1.LumeService/UpdateLume")
        .json(&json!({
            "lumeId": lume["lumeId"],
            "latitude": 35.68,
            "longitude": 139.69,
            "updateMask": ["latitude", "longitude"],
        }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>()["lume"].clone();
    assert_eq!(updated["name"], "Tokyo");
    assert_eq!(updated["latitude"], 35.68);

    let found = server
        .post("/lume.v1.LumeService/SearchLumesByLocation")
        .json(&json!({
            "lumoId": lumo["lumoId"],
            "minLat": 35.0, "maxLat": 36.0,
            "minLng": 139.0, "maxLng": 140.0,
        }))
        .await
        .json::<Value>();
    assert_eq!(found["lumes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_lume_rejects_out_of_range_latitude() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;

    let response = server
        .post("/lume.v1.LumeService/CreateLume")
        .json(&json!({
            "lumoId": lumo["lumoId"],
            "type": "LUME_TYPE_CITY",
            "name": "Nowhere",
            "latitude": 91.0,
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_list_and_count_lumes() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;
    let lumo_id = str_field(&lumo, "lumoId");
    create_lume(&server, lumo_id, "Tokyo").await;
    create_lume(&server, lumo_id, "Osaka").await;

    let listed = server
        .post("/lume.v1.LumeService/ListLumes")
        .json(&json!({ "lumoId": lumo_id, "type": "LUME_TYPE_CITY" }))
        .await
        .json::<Value>();
    assert_eq!(listed["lumes"].as_array().unwrap().len(), 2);

    let count = server
        .post("/lume.v1.LumeService/CountLumes")
        .json(&json!({ "lumoId": lumo_id }))
        .await
        .json::<Value>();
    assert_eq!(count["count"], 2);
}

// ============================================================================
// Link
// ============================================================================

#[tokio::test]
async fn test_list_links_dispatch() {
    let (server, _) = build_test_app().await;
    let lumo = create_lumo(&server, "Japan Trip").await;
    let lumo_id = str_field(&lumo, "lumoId");
    let tokyo = create_lume(&server, lumo_id, "Tokyo").await;
    let kyoto = create_lume(&server, lumo_id, "Kyoto").await;
    let (tokyo, kyoto) = (str_field(&tokyo, "lumeId"), str_field(&kyoto, "lumeId"));

    create_link(&server, tokyo, kyoto, "LINK_TYPE_TRAVEL").await;
    create_link(&server, kyoto, tokyo, "LINK_TYPE_RECOMMENDED").await;

    let between = list_links(&server, json!({ "fromLumeId": tokyo, "toLumeId": kyoto })).await;
    between.assert_status_ok();
    assert_eq!(between.json::<Value>()["links"].as_array().unwrap().len(), 1);

    let either = list_links(&server, json!({ "lumeId": tokyo })).await.json::<Value>();
    assert_eq!(either["links"].as_array().unwrap().len(), 2);

    let typed = list_links(&server, json!({ "lumeId": tokyo, "type": "LINK_TYPE_TRAVEL" })).await
        .json::<Value>();
    assert_eq!(typed["links"].as_array().unwrap().len(), 1);

    let by_type = list_links(&server, json!({ "type": "LINK_TYPE_RECOMMENDED" })).await.json::<Value>();
    assert_eq!(by_type["links"].as_array().unwrap().len(), 1);

    let by_lumo = list_links(&server, json!({ "lumoUuid": lumo_id })).await;
    assert_eq!(by_lumo.status_code(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(by_lumo.json::<Value>()["code"], "unimplemented");

    let no_filter = list_links(&server, json!({})).await;
    no_filter.assert_status_bad_request();
}

#[tokio::test]
async fn test_link_travel_details_on_the_wire() {
    let (server, _) = build_test_app().await;
    let (a, b) = (uuid::Uuid::new_v4().to_string(), uuid::Uuid::new_v4().to_string());

    let response = server
        .post("/link.v1.LinkService/CreateLink")
        .json(&json!({
            "link": {
                "fromLumeId": a,
                "toLumeId": b,
                "type": "LINK_TYPE_TRAVEL",
                "travel": {
                    "mode": "TRAVEL_MODE_TRAIN",
                    "durationSec": 8400,
                    "costEstimate": 14000.0,
                    "distanceMeters": 515000.0
                },
                "sequenceIndex": 0
            }
        }))
        .await;
    response.assert_status_ok();
    let link = response.json::<Value>()["link"].clone();
    assert_eq!(link["travel"]["mode"], "TRAVEL_MODE_TRAIN");
    assert_eq!(link["travel"]["durationSec"], 8400);
    assert_eq!(link["sequenceIndex"], 0);

    let fetched = server
        .post("/link.v1.LinkService/GetLink")
        .json(&json!({ "linkId": link["linkId"] }))
        .await
        .json::<Value>();
    assert_eq!(fetched["link"], link);
}

#[tokio::test]
async fn test_count_links_requires_single_anchor() {
    let (server, _) = build_test_app().await;
    let (a, b) = (uuid::Uuid::new_v4().to_string(), uuid::Uuid::new_v4().to_string());
    create_link(&server, &a, &b, "LINK_TYPE_CUSTOM").await;

    let count = server
        .post("/link.v1.LinkService/CountLinks")
        .json(&json!({ "fromLumeId": a }))
        .await
        .json::<Value>();
    assert_eq!(count["count"], 1);

    let both = server
        .post("/link.v1.LinkService/CountLinks")
        .json(&json!({ "fromLumeId": a, "toLumeId": b }))
        .await;
    both.assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_link_requires_id() {
    let (server, _) = build_test_app().await;

    let response = server
        .post("/link.v1.LinkService/DeleteLink")
        .json(&json!({ "linkId": "" }))
        .await;

    response.assert_status_bad_request();
}
