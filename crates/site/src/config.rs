//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Backends
//! - `STAGEFRONT_STORE` - Content store backend: `rest`, `postgres` or `memory` (default: memory)
//! - `STAGEFRONT_AUTH` - Auth strategy: `provider` or `store` (default: store)
//!
//! ## Required per backend
//! - `STAGEFRONT_STORE_URL` - Hosted project URL (`rest` store, `provider` auth)
//! - `STAGEFRONT_STORE_API_KEY` - Hosted project API key (`rest` store, `provider` auth)
//! - `STAGEFRONT_DATABASE_URL` - `PostgreSQL` connection string (`postgres` store;
//!   falls back to `DATABASE_URL`)
//! - `STAGEFRONT_ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the editor password (`store` auth)
//!
//! ## Optional
//! - `STAGEFRONT_DATA_DIR` - Local durable storage directory (default: .stagefront)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".stagefront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Directory holding the local cart, session and content fallback
    pub data_dir: PathBuf,
    /// Remote content store backend
    pub store: StoreConfig,
    /// Auth strategy guarding edits
    pub auth: AuthConfig,
}

/// Which content store to talk to.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub enum StoreConfig {
    /// In-process store; content lives only as long as the process.
    Memory,
    /// Hosted REST store.
    Rest(HostedProject),
    /// Direct `PostgreSQL` connection.
    Postgres { database_url: SecretString },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Rest(project) => f.debug_tuple("Rest").field(project).finish(),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

/// How editors sign in.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub enum AuthConfig {
    /// Hosted identity provider (email + password, opaque access token).
    Provider(HostedProject),
    /// Username looked up in the content store, password checked against a
    /// configured argon2 hash.
    Store { admin_password_hash: SecretString },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(project) => f.debug_tuple("Provider").field(project).finish(),
            Self::Store { .. } => f
                .debug_struct("Store")
                .field("admin_password_hash", &"[REDACTED]")
                .finish(),
        }
    }
}

/// A hosted project: one base URL serving both the REST API and the
/// identity provider, plus its API key.
#[derive(Clone)]
pub struct HostedProject {
    /// Project base URL (e.g., <https://abc.supabase.co>)
    pub url: Url,
    /// Anonymous API key sent with every request
    pub api_key: SecretString,
}

impl std::fmt::Debug for HostedProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedProject")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable required by the selected backends
    /// is missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`SiteConfig::from_env`].
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&vars);

        let data_dir = PathBuf::from(env.get_or_default("STAGEFRONT_DATA_DIR", DEFAULT_DATA_DIR));

        let store = match env.get_or_default("STAGEFRONT_STORE", "memory").as_str() {
            "memory" => StoreConfig::Memory,
            "rest" => StoreConfig::Rest(HostedProject::from_env(&env)?),
            "postgres" => StoreConfig::Postgres {
                database_url: env.database_url("STAGEFRONT_DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STAGEFRONT_STORE".to_string(),
                    format!("unknown backend '{other}' (expected rest, postgres or memory)"),
                ));
            }
        };

        let auth = match env.get_or_default("STAGEFRONT_AUTH", "store").as_str() {
            "provider" => AuthConfig::Provider(HostedProject::from_env(&env)?),
            "store" => AuthConfig::Store {
                admin_password_hash: env.admin_password_hash()?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STAGEFRONT_AUTH".to_string(),
                    format!("unknown strategy '{other}' (expected provider or store)"),
                ));
            }
        };

        Ok(Self {
            data_dir,
            store,
            auth,
        })
    }
}

impl HostedProject {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw = env.required("STAGEFRONT_STORE_URL")?;
        let url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("STAGEFRONT_STORE_URL".to_string(), e.to_string())
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "STAGEFRONT_STORE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        Ok(Self {
            url,
            api_key: SecretString::from(env.required("STAGEFRONT_STORE_API_KEY")?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required environment variable. Blank values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional environment variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// The editor password hash must be a PHC string (`$argon2id$...`).
    fn admin_password_hash(&self) -> Result<SecretString, ConfigError> {
        const KEY: &str = "STAGEFRONT_ADMIN_PASSWORD_HASH";
        let value = self.required(KEY)?;
        argon2::PasswordHash::new(&value).map_err(|e| {
            ConfigError::InvalidEnvVar(KEY.to_string(), format!("not a PHC hash string: {e}"))
        })?;
        Ok(SecretString::from(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    // argon2id hash of "letmein" with the default argon2 crate parameters.
    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$8zmnLOYk3FfvWpQFUWOrILXxE89i+jtebrjgbuEAY0o";

    fn load(pairs: &[(&str, &str)]) -> Result<SiteConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SiteConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STAGEFRONT_ADMIN_PASSWORD_HASH", HASH)]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".stagefront"));
        assert!(matches!(config.store, StoreConfig::Memory));
        assert!(matches!(config.auth, AuthConfig::Store { .. }));
    }

    #[test]
    fn test_store_auth_requires_hash() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "STAGEFRONT_ADMIN_PASSWORD_HASH"));
    }

    #[test]
    fn test_store_auth_rejects_plaintext_password() {
        let err = load(&[("STAGEFRONT_ADMIN_PASSWORD_HASH", "hunter2")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_rest_store() {
        let config = load(&[
            ("STAGEFRONT_STORE", "rest"),
            ("STAGEFRONT_STORE_URL", "https://abc.supabase.co"),
            ("STAGEFRONT_STORE_API_KEY", "anon-key"),
            ("STAGEFRONT_AUTH", "provider"),
        ])
        .unwrap();

        let StoreConfig::Rest(project) = &config.store else {
            panic!("expected rest store");
        };
        assert_eq!(project.url.host_str(), Some("abc.supabase.co"));
        assert_eq!(project.api_key.expose_secret(), "anon-key");
        assert!(matches!(config.auth, AuthConfig::Provider(_)));
    }

    #[test]
    fn test_rest_store_requires_url() {
        let err = load(&[
            ("STAGEFRONT_STORE", "rest"),
            ("STAGEFRONT_STORE_API_KEY", "anon-key"),
            ("STAGEFRONT_ADMIN_PASSWORD_HASH", HASH),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "STAGEFRONT_STORE_URL"));
    }

    #[test]
    fn test_postgres_falls_back_to_database_url() {
        let config = load(&[
            ("STAGEFRONT_STORE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/stagefront"),
            ("STAGEFRONT_ADMIN_PASSWORD_HASH", HASH),
        ])
        .unwrap();

        let StoreConfig::Postgres { database_url } = &config.store else {
            panic!("expected postgres store");
        };
        assert_eq!(database_url.expose_secret(), "postgres://localhost/stagefront");
    }

    #[test]
    fn test_unknown_backend() {
        let err = load(&[
            ("STAGEFRONT_STORE", "mongo"),
            ("STAGEFRONT_ADMIN_PASSWORD_HASH", HASH),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "STAGEFRONT_STORE"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[
            ("STAGEFRONT_STORE", "rest"),
            ("STAGEFRONT_STORE_URL", "https://abc.supabase.co"),
            ("STAGEFRONT_STORE_API_KEY", "super_secret_api_key"),
            ("STAGEFRONT_ADMIN_PASSWORD_HASH", HASH),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("abc.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
        assert!(!debug_output.contains("argon2id"));
    }
}
