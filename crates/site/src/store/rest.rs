//! Hosted REST content store.
//!
//! Talks to a `PostgREST` endpoint (`{base}/rest/v1/...`), the API a hosted
//! Supabase project exposes for its tables.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use stagefront_core::UserId;

use super::{ContentStore, SectionRecord, StoreError, UserRecord};
use crate::config::HostedProject;

/// `PostgREST` client for the `content` and `users` tables.
#[derive(Clone)]
pub struct RestContentStore {
    client: reqwest::Client,
    base: Url,
}

impl std::fmt::Debug for RestContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestContentStore")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct UserRow {
    id: String,
    username: String,
    #[serde(default)]
    name: Option<String>,
}

impl RestContentStore {
    /// Create a client for a hosted project.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the API key is not a valid header
    /// value, or `StoreError::Http` if the client fails to build.
    pub fn new(project: &HostedProject) -> Result<Self, StoreError> {
        let key = project.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| StoreError::Decode(format!("invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::Decode(format!("invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert("Authorization", bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base: project.url.clone(),
        })
    }

    /// `{base}/rest/v1/{table}` with the given query pairs.
    fn table_url(&self, table: &str, query: &[(&str, &str)]) -> Result<Url, StoreError> {
        let mut url = self
            .base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StoreError::Decode(format!("invalid store URL: {e}")))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }
}

/// Map a non-success response to `StoreError::Status`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        message: body.chars().take(200).collect(),
    })
}

#[async_trait]
impl ContentStore for RestContentStore {
    fn backend(&self) -> &'static str {
        "rest"
    }

    #[instrument(skip(self))]
    async fn read_all_sections(&self) -> Result<Vec<SectionRecord>, StoreError> {
        let url = self.table_url("content", &[("select", "*")])?;
        let response = check_status(self.client.get(url).send().await?).await?;
        response
            .json::<Vec<SectionRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    #[instrument(skip(self, record), fields(section = %record.section))]
    async fn upsert_section(&self, record: &SectionRecord) -> Result<(), StoreError> {
        let url = self.table_url("content", &[("on_conflict", "section")])?;
        let response = self
            .client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[record])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let filter = format!("eq.{username}");
        let url = self.table_url(
            "users",
            &[("username", filter.as_str()), ("select", "id,username,name")],
        )?;
        let response = check_status(self.client.get(url).send().await?).await?;
        let rows = response
            .json::<Vec<UserRow>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next().map(|row| UserRecord {
            id: UserId::new(row.id),
            username: row.username,
            name: row.name,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn store(base: &str) -> RestContentStore {
        RestContentStore::new(&HostedProject {
            url: Url::parse(base).unwrap(),
            api_key: SecretString::from("anon-key"),
        })
        .unwrap()
    }

    #[test]
    fn test_table_url() {
        let url = store("https://abc.supabase.co")
            .table_url("content", &[("select", "*")])
            .unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/content?select=*");
    }

    #[test]
    fn test_user_filter_is_encoded() {
        let url = store("https://abc.supabase.co/")
            .table_url("users", &[("username", "eq.a&b"), ("select", "id")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/users?username=eq.a%26b&select=id"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let debug_output = format!("{:?}", store("https://abc.supabase.co"));
        assert!(debug_output.contains("abc.supabase.co"));
        assert!(!debug_output.contains("anon-key"));
    }
}
