//! Stagefront site library.
//!
//! The services behind the artist site: the persisted cart, the content sync
//! engine with its remote store and local fallback, the auth gate that
//! guards editing, and contact form handling. Hosts (the `stagefront` CLI,
//! tests) build an [`state::AppState`] and drive it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;

/// Embedded SQL migrations for the `postgres` content store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
