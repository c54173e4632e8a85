//! Unified error handling.
//!
//! Services swallow and log most failures themselves (see each module).
//! `SiteError` covers what does reach a host: startup failures, refused
//! edits, seed results, form validation and lookups by ID.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::contact::ValidationErrors;
use crate::services::content::SeedError;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Content store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Auth backend could not be set up.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Seeding the store stopped early.
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Form input was rejected.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Database migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The action needs a signed-in editor.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Result type alias for `SiteError`.
pub type Result<T> = std::result::Result<T, SiteError>;
