//! Service layer for Lumo.
//!
//! Application logic for each entity:
//! - Lumo (travel plans owned by a user)
//! - Lume (nodes of a plan)
//! - Link (directed edges between lumes)
//!
//! Services validate input and resolve updates before touching a
//! repository, so a rejected request never reaches the store.

mod link;
mod lume;
mod lumo;

pub use link::LinkService;
pub use lume::LumeService;
pub use lumo::LumoService;
