//! Data models for Lumo.
//!
//! Defines the domain records (lumos, lumes, links), their enums, and
//! the request-normalization helpers shared by all three entities:
//! identifier parsing, pagination policies and field masks.

mod field_mask;
mod ids;
mod link;
mod lume;
mod lumo;
mod pagination;

pub use field_mask::*;
pub use ids::*;
pub use link::*;
pub use lume::*;
pub use lumo::*;
pub use pagination::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new external id
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
