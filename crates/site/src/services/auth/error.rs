//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while verifying credentials.
///
/// The gate never shows these to the user: every failure becomes a plain
/// "Invalid credentials".
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] stagefront_core::EmailError),

    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account with that username.
    #[error("user not found")]
    UserNotFound,

    /// User lookup in the content store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Identity provider could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Identity provider answered with an unexpected status.
    #[error("identity provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
