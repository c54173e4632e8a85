//! Stagefront Core - Shared types library.
//!
//! This crate provides common types used across all Stagefront components:
//! - `site` - Content sync, cart and auth services for the artist site
//! - `cli` - Command-line host for browsing, editing and seeding content
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere, including a browser build.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and section names
//! - [`content`] - Typed section payloads, patches and the compiled-in defaults
//! - [`cart`] - The cart aggregate and its merge rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod content;
pub mod types;

pub use cart::{Cart, CartLine};
pub use types::*;
