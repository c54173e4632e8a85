//! Business logic services for the site.
//!
//! # Services
//!
//! - `cart` - Persisted shopping cart
//! - `content` - Section content with optimistic updates, remote sync and local fallback
//! - `auth` - Editor sign-in gate (identity provider or store lookup)
//! - `contact` - Contact form and newsletter signup validation

pub mod auth;
pub mod cart;
pub mod contact;
pub mod content;

pub use auth::{AuthError, AuthGate, CredentialVerifier, Session};
pub use cart::{CartEngine, CartState};
pub use contact::{
    ContactForm, ContactReceipt, Field, NewsletterReceipt, ValidationErrors, subscribe_newsletter,
};
pub use content::{
    ContentSource, ContentState, ContentSync, LoadPhase, SeedError, SeedReport, SyncStatus,
};
