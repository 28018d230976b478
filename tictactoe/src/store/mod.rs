//! Store module holding every live game session.
//!
//! This module implements:
//! - GameStore: the shared map from game id to session, with one lock per session
//! - StoreConfig: retention window and invite-link base URL
//! - sweep: the pure expiry function applied at the start of every operation
//!
//! ## Architecture
//!
//! Expiry is lazy. No timer runs; each public operation first drops every
//! session older than the retention window, so an untouched session lingers
//! until some request reaches the store.

pub mod config;
pub mod manager;
pub mod sweep;

pub use config::StoreConfig;
pub use manager::{CreatedGame, GameStore};
pub use sweep::{Expiring, is_expired, sweep};

/// Opaque session identifier.
pub type GameId = String;
