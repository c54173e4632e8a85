//! Command implementations.
//!
//! Every command except `migrate`, `hash-password`, `contact` and
//! `subscribe` runs against a fully started [`AppState`]: content loaded
//! (remote, local fallback or defaults) and any saved session restored.

pub mod auth;
pub mod cart;
pub mod contact;
pub mod content;
pub mod migrate;

use std::io::BufRead;

use thiserror::Error;

use stagefront_site::config::SiteConfig;
use stagefront_site::error::SiteError;
use stagefront_site::state::AppState;

/// Errors shared by the site commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

impl From<stagefront_site::config::ConfigError> for CommandError {
    fn from(e: stagefront_site::config::ConfigError) -> Self {
        Self::Site(e.into())
    }
}

/// Load configuration from the environment and start the site state.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a backend cannot be built.
pub async fn load_state() -> Result<AppState, CommandError> {
    let config = SiteConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(AppState::from_config(&config).await?)
}

/// Use the given secret or read one line from stdin.
pub(crate) fn secret_or_stdin(secret: Option<String>) -> Result<String, CommandError> {
    if let Some(secret) = secret {
        return Ok(secret);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_owned();
    if line.is_empty() {
        return Err(CommandError::Rejected("No password given".to_owned()));
    }
    Ok(line)
}

/// Pretty-print a JSON value to stdout.
#[allow(clippy::print_stdout)]
pub(crate) fn print_json(value: &serde_json::Value) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
