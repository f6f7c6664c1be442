//! Shared helpers for the integration tests.

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use lumo::api;
use lumo::db::{self, DbPool};
use lumo::AppState;

pub const OWNER: &str = "11111111-1111-1111-1111-111111111111";
pub const OTHER_OWNER: &str = "22222222-2222-2222-2222-222222222222";

/// Create an in-memory database with the schema applied
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:").await.expect("Failed to create test database");
    db::initialize_schema(&pool).await.expect("Failed to initialize schema");
    pool
}

/// Build application state over a fresh in-memory database
pub async fn build_test_state() -> AppState {
    AppState::from_pool(setup_test_db().await)
}

/// Build a test server with the full API router
pub async fn build_test_app() -> (TestServer, AppState) {
    let state = build_test_state().await;

    let app = Router::new().merge(api::routes()).with_state(state.clone());

    let server = TestServer::new(app).expect("Failed to create test server");

    (server, state)
}
