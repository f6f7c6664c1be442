//! API Routes for Lumo
//!
//! This module combines all API routes into a single router.
//! Entity services are exposed as Connect-style unary RPCs: one POST
//! route per method, nested under the fully qualified service name.

mod link;
mod lume;
mod lumo;
pub mod rpc;
pub mod status;

use axum::Router;

use crate::AppState;

pub use link::{LinkMessage, TravelDetailsMessage};
pub use lume::LumeMessage;
pub use lumo::LumoMessage;

/// Build the complete API router.
///
/// Route structure:
/// - /lumo.v1.LumoService/* - Lumo RPCs
/// - /lume.v1.LumeService/* - Lume RPCs
/// - /link.v1.LinkService/* - Link RPCs
/// - /health - Health check (GET)
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/lumo.v1.LumoService", lumo::routes())
        .nest("/lume.v1.LumeService", lume::routes())
        .nest("/link.v1.LinkService", link::routes())
}
