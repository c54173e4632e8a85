//! Direct `PostgreSQL` content store.
//!
//! Same tables as the hosted store, reached over a connection pool. Schema
//! lives in `crates/site/migrations/` and is applied with
//! `stagefront migrate`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;
use uuid::Uuid;

use stagefront_core::UserId;

use super::{ContentStore, SectionRecord, StoreError, UserRecord};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Content store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip(self))]
    async fn read_all_sections(&self) -> Result<Vec<SectionRecord>, StoreError> {
        let rows: Vec<(String, JsonValue, DateTime<Utc>)> = sqlx::query_as(
            r"
            SELECT section, data, updated_at
            FROM content
            ORDER BY section
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(section, data, updated_at)| SectionRecord {
                section,
                data,
                updated_at,
            })
            .collect())
    }

    #[instrument(skip(self, record), fields(section = %record.section))]
    async fn upsert_section(&self, record: &SectionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO content (section, data, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (section) DO UPDATE SET data = $2, updated_at = $3
            ",
        )
        .bind(&record.section)
        .bind(&record.data)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let row: Option<(Uuid, String, Option<String>)> = sqlx::query_as(
            r"
            SELECT id, username, name
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, name)| UserRecord {
            id: UserId::new(id.to_string()),
            username,
            name,
        }))
    }
}
