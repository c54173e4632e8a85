//! Editor session commands.
//!
//! # Usage
//!
//! ```bash
//! # Identity provider: sign in with an email
//! stagefront login admin@example.com
//!
//! # Store accounts: sign in with a username
//! echo "$PASSWORD" | stagefront login admin
//!
//! stagefront whoami
//! stagefront logout
//!
//! # Generate STAGEFRONT_ADMIN_PASSWORD_HASH
//! stagefront hash-password
//! ```
//!
//! # Environment Variables
//!
//! - `STAGEFRONT_AUTH` - `provider` (hosted identity service) or `store` (default)
//! - `STAGEFRONT_STORE_URL` / `STAGEFRONT_STORE_API_KEY` - Hosted project for `provider`
//! - `STAGEFRONT_ADMIN_PASSWORD_HASH` - Argon2 hash for store accounts

use stagefront_site::services::auth::hash_password as hash;
use stagefront_site::state::AppState;

use super::{CommandError, secret_or_stdin};

/// Sign in. Failure leaves any existing session untouched.
///
/// # Errors
///
/// Returns an error if the password cannot be read or sign-in is refused.
#[allow(clippy::print_stdout)]
pub async fn login(
    state: &AppState,
    identifier: &str,
    password: Option<String>,
) -> Result<(), CommandError> {
    let password = secret_or_stdin(password)?;
    if !state.auth().login(identifier, &password).await {
        return Err(CommandError::Rejected("Invalid credentials".to_owned()));
    }
    if let Some(user) = state.auth().user() {
        println!("Signed in as {}", user.login);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn logout(state: &AppState) {
    state.auth().logout().await;
    println!("Signed out");
}

#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match state.auth().user() {
        Some(user) => match user.name {
            Some(name) => println!("{} ({name})", user.login),
            None => println!("{}", user.login),
        },
        None => println!("Not signed in"),
    }
}

/// Print an Argon2 hash of the given password.
///
/// # Errors
///
/// Returns an error if the password cannot be read or hashed.
#[allow(clippy::print_stdout)]
pub fn hash_password(password: Option<String>) -> Result<(), CommandError> {
    let password = secret_or_stdin(password)?;
    let hashed = hash(&password).map_err(|e| CommandError::Rejected(e.to_string()))?;
    println!("{hashed}");
    Ok(())
}
