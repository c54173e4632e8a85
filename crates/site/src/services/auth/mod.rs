//! Editor sign-in gate.
//!
//! Write affordances (content edits, seeding) are only offered to an
//! authenticated session. Two interchangeable strategies verify credentials:
//!
//! - [`ProviderVerifier`]: a hosted identity provider issuing an access token
//! - [`StoreLookupVerifier`]: username lookup in the content store plus an
//!   argon2 password hash from configuration
//!
//! Whichever is used, [`AuthGate::login`] only answers yes or no. Unknown
//! users, wrong passwords and network errors all look the same to the
//! caller; the reason is logged.

mod error;
mod provider;
mod store_lookup;

pub use error::AuthError;
pub use provider::ProviderVerifier;
pub use store_lookup::{StoreLookupVerifier, hash_password};

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

use stagefront_core::SessionUser;

use crate::config::AuthConfig;
use crate::storage::{AUTH_KEY, LocalStorage, load_json, save_json};
use crate::store::ContentStore;

/// The current sign-in state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(SessionUser),
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

/// A successful credential check.
pub struct VerifiedLogin {
    pub user: SessionUser,
    /// Opaque token to keep for revalidation and remote sign-out.
    pub access_token: Option<SecretString>,
}

/// A way of checking editor credentials.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Short strategy name for logs.
    fn strategy(&self) -> &'static str;

    /// Check an identifier/secret pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` describing why the pair was not accepted.
    async fn verify(&self, identifier: &str, secret: &str) -> Result<VerifiedLogin, AuthError>;

    /// Whether a session restored from local storage is still valid.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if validity cannot be determined.
    async fn revalidate(
        &self,
        _user: &SessionUser,
        _token: Option<&SecretString>,
    ) -> Result<bool, AuthError> {
        Ok(true)
    }

    /// End the session remotely.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the remote sign-out fails.
    async fn sign_out(&self, _token: &SecretString) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Build the verifier selected by configuration.
///
/// # Errors
///
/// Returns `AuthError` if the identity provider client cannot be built.
pub fn verifier_from_config(
    config: &AuthConfig,
    store: Arc<dyn ContentStore>,
) -> Result<Arc<dyn CredentialVerifier>, AuthError> {
    Ok(match config {
        AuthConfig::Provider(project) => Arc::new(ProviderVerifier::new(project)?),
        AuthConfig::Store {
            admin_password_hash,
        } => Arc::new(StoreLookupVerifier::new(store, admin_password_hash.clone())),
    })
}

/// The session as written to local storage.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    is_authenticated: bool,
    #[serde(default)]
    user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

/// The sign-in gate.
pub struct AuthGate {
    verifier: Arc<dyn CredentialVerifier>,
    storage: Arc<dyn LocalStorage>,
    session: watch::Sender<Session>,
    token: Mutex<Option<SecretString>>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("strategy", &self.verifier.strategy())
            .field("session", &*self.session.borrow())
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Create a signed-out gate. Call [`AuthGate::restore`] to pick up a
    /// persisted session.
    #[must_use]
    pub fn new(verifier: Arc<dyn CredentialVerifier>, storage: Arc<dyn LocalStorage>) -> Self {
        let (session, _) = watch::channel(Session::Anonymous);
        Self {
            verifier,
            storage,
            session,
            token: Mutex::new(None),
        }
    }

    /// Try to sign in.
    ///
    /// Returns `true` and establishes the session if the credentials are
    /// accepted. On `false` the session is left exactly as it was.
    #[instrument(skip(self, secret), fields(strategy = self.verifier.strategy()))]
    pub async fn login(&self, identifier: &str, secret: &str) -> bool {
        let verified = match self.verifier.verify(identifier, secret).await {
            Ok(verified) => verified,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                return false;
            }
        };

        let persisted = PersistedSession {
            is_authenticated: true,
            user: Some(verified.user.clone()),
            access_token: verified
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        };
        if let Err(e) = save_json(self.storage.as_ref(), AUTH_KEY, &persisted) {
            tracing::warn!(error = %e, "Failed to persist session");
        }

        self.set_token(verified.access_token);
        tracing::info!(user = %verified.user.id, "Signed in");
        self.session
            .send_replace(Session::Authenticated(verified.user));
        true
    }

    /// Sign out and forget the persisted session.
    #[instrument(skip(self), fields(strategy = self.verifier.strategy()))]
    pub async fn logout(&self) {
        if let Some(token) = self.take_token()
            && let Err(e) = self.verifier.sign_out(&token).await
        {
            tracing::warn!(error = %e, "Remote sign-out failed");
        }

        self.session.send_replace(Session::Anonymous);
        if let Err(e) = self.storage.remove(AUTH_KEY) {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }

    /// Reload the session persisted by an earlier run.
    ///
    /// A session the verifier rejects is dropped. If validity cannot be
    /// determined (provider unreachable) the session is kept.
    ///
    /// Returns whether a session is now active.
    #[instrument(skip(self), fields(strategy = self.verifier.strategy()))]
    pub async fn restore(&self) -> bool {
        let persisted = match load_json::<PersistedSession>(self.storage.as_ref(), AUTH_KEY) {
            Ok(Some(persisted)) => persisted,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session is unreadable");
                self.forget_persisted();
                return false;
            }
        };

        let user = match persisted.user {
            Some(user) if persisted.is_authenticated => user,
            _ => {
                self.forget_persisted();
                return false;
            }
        };
        let token = persisted.access_token.map(SecretString::from);

        match self.verifier.revalidate(&user, token.as_ref()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user = %user.id, "Stored session is no longer valid");
                self.forget_persisted();
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not revalidate stored session, keeping it");
            }
        }

        self.set_token(token);
        self.session.send_replace(Session::Authenticated(user));
        true
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.session.borrow().user().cloned()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Watch the session for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    fn forget_persisted(&self) {
        if let Err(e) = self.storage.remove(AUTH_KEY) {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }

    fn set_token(&self, token: Option<SecretString>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = token;
        }
    }

    fn take_token(&self) -> Option<SecretString> {
        self.token.lock().ok()?.take()
    }
}
