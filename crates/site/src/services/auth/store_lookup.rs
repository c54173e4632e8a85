//! Store-backed sign-in.
//!
//! The username is looked up in the content store's `users` table and the
//! password is checked against the argon2 hash from configuration. Nothing
//! secret lives in the store.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use stagefront_core::SessionUser;

use super::{AuthError, CredentialVerifier, VerifiedLogin};
use crate::store::ContentStore;

/// Verifies usernames against the store and passwords against a fixed hash.
pub struct StoreLookupVerifier {
    store: Arc<dyn ContentStore>,
    password_hash: SecretString,
}

impl std::fmt::Debug for StoreLookupVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLookupVerifier")
            .field("store", &self.store.backend())
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl StoreLookupVerifier {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, password_hash: SecretString) -> Self {
        Self {
            store,
            password_hash,
        }
    }
}

#[async_trait]
impl CredentialVerifier for StoreLookupVerifier {
    fn strategy(&self) -> &'static str {
        "store"
    }

    async fn verify(&self, identifier: &str, secret: &str) -> Result<VerifiedLogin, AuthError> {
        let user = self.store.find_user_by_username(identifier.trim()).await?;

        // Hash for unknown usernames too, so both rejections take as long.
        let checked = verify_password(secret, self.password_hash.expose_secret());
        let user = user.ok_or(AuthError::UserNotFound)?;
        checked?;

        Ok(VerifiedLogin {
            user: SessionUser {
                id: user.id,
                login: user.username,
                name: user.name,
            },
            access_token: None,
        })
    }
}

/// Hash a password into a PHC string suitable for
/// `STAGEFRONT_ADMIN_PASSWORD_HASH`.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
