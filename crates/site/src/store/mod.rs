//! Remote content store clients.
//!
//! The store holds one JSON document per section in a `content` table keyed
//! by section name, and (for store-backed auth) a `users` table. All
//! backends implement [`ContentStore`]; the services only ever see
//! `Arc<dyn ContentStore>`.

mod memory;
mod postgres;
mod rest;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;
pub use rest::RestContentStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use stagefront_core::{SectionName, UserId};

use crate::config::StoreConfig;

/// Errors from a content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The store answered with something that is not the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The store is unreachable or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// One row of the `content` table.
///
/// `section` stays a raw string: rows written by other tools may name
/// sections this build does not know, and those are skipped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub section: String,
    pub data: JsonValue,
    pub updated_at: DateTime<Utc>,
}

impl SectionRecord {
    /// A record for `section` stamped with the current time.
    #[must_use]
    pub fn now(section: SectionName, data: JsonValue) -> Self {
        Self {
            section: section.as_str().to_string(),
            data,
            updated_at: Utc::now(),
        }
    }
}

/// One row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Remote persistence for section payloads.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Every stored section.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    async fn read_all_sections(&self) -> Result<Vec<SectionRecord>, StoreError>;

    /// Insert the record, or overwrite the existing row with the same section.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write is rejected or does not reach the store.
    async fn upsert_section(&self, record: &SectionRecord) -> Result<(), StoreError>;

    /// Look up an editor account by username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lookup fails. An unknown username is `Ok(None)`.
    async fn find_user_by_username(&self, username: &str)
    -> Result<Option<UserRecord>, StoreError>;
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns `StoreError` if the HTTP client cannot be built or the database
/// cannot be reached.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ContentStore>, StoreError> {
    let store: Arc<dyn ContentStore> = match config {
        StoreConfig::Memory => Arc::new(MemoryContentStore::new()),
        StoreConfig::Rest(project) => Arc::new(RestContentStore::new(project)?),
        StoreConfig::Postgres { database_url } => {
            Arc::new(PgContentStore::new(postgres::create_pool(database_url).await?))
        }
    };
    tracing::debug!(backend = store.backend(), "Content store ready");
    Ok(store)
}
