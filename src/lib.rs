//! Lumo - Travel Planning Backend
//!
//! Stores travel plans (lumos), the places and events inside them (lumes)
//! and the directed links between those places, behind a Connect-style
//! JSON RPC surface.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
