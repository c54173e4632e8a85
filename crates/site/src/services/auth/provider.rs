//! Hosted identity provider sign-in.
//!
//! Speaks the `GoTrue` API a hosted Supabase project serves under
//! `{base}/auth/v1`: a password grant to sign in, `/user` to check a stored
//! token on startup and `/logout` to end the session remotely.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use stagefront_core::{Email, SessionUser, UserId};

use super::{AuthError, CredentialVerifier, VerifiedLogin};
use crate::config::HostedProject;

/// Identity provider client.
#[derive(Clone)]
pub struct ProviderVerifier {
    client: reqwest::Client,
    base: Url,
}

impl std::fmt::Debug for ProviderVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderVerifier")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: ProviderUser,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
}

impl ProviderUser {
    fn into_session_user(self, fallback_login: &str) -> SessionUser {
        SessionUser {
            id: UserId::new(self.id),
            login: self.email.unwrap_or_else(|| fallback_login.to_string()),
            name: self.user_metadata.full_name.or(self.user_metadata.name),
        }
    }
}

impl ProviderVerifier {
    /// Create a client for a hosted project.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the HTTP client fails to build, or
    /// `AuthError::Provider` if the API key is not a valid header value.
    pub fn new(project: &HostedProject) -> Result<Self, AuthError> {
        let mut api_key = HeaderValue::from_str(project.api_key.expose_secret()).map_err(|e| {
            AuthError::Provider {
                status: 0,
                message: format!("invalid API key format: {e}"),
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base: project.url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base
            .join(&format!("auth/v1/{path}"))
            .map_err(|e| AuthError::Provider {
                status: 0,
                message: format!("invalid provider URL: {e}"),
            })
    }
}

async fn unexpected(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthError::Provider {
        status,
        message: body.chars().take(200).collect(),
    }
}

#[async_trait]
impl CredentialVerifier for ProviderVerifier {
    fn strategy(&self) -> &'static str {
        "provider"
    }

    #[instrument(skip(self, secret))]
    async fn verify(&self, identifier: &str, secret: &str) -> Result<VerifiedLogin, AuthError> {
        let email = Email::parse(identifier)?;

        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url)
            .json(&PasswordGrant {
                email: email.as_str(),
                password: secret,
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let token: TokenResponse = response.json().await?;
                Ok(VerifiedLogin {
                    user: token.user.into_session_user(email.as_str()),
                    access_token: Some(SecretString::from(token.access_token)),
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(AuthError::InvalidCredentials)
            }
            _ => Err(unexpected(response).await),
        }
    }

    #[instrument(skip(self, user, token), fields(user = %user.id))]
    async fn revalidate(
        &self,
        user: &SessionUser,
        token: Option<&SecretString>,
    ) -> Result<bool, AuthError> {
        let Some(token) = token else {
            return Ok(false);
        };

        let response = self
            .client
            .get(self.endpoint("user")?)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let current: ProviderUser = response.json().await?;
                Ok(current.id == user.id.as_str())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            _ => Err(unexpected(response).await),
        }
    }

    #[instrument(skip(self, token))]
    async fn sign_out(&self, token: &SecretString) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("logout")?)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        // An already-expired token means there is nothing left to end.
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(()),
            _ => Err(unexpected(response).await),
        }
    }
}
