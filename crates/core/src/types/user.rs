//! Authenticated user identity.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// The identity carried by an authenticated session.
///
/// `login` is whatever the user typed to sign in: an email address for the
/// identity provider, a username for store-backed accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Stable user ID issued by the identity source.
    pub id: UserId,
    /// Email address or username used to sign in.
    pub login: String,
    /// Display name, when the identity source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
