//! Local durable key-value storage.
//!
//! The cart, the signed-in session and the content fallback snapshot each
//! live under one fixed key. Storage is synchronous and every failure is
//! recoverable: callers log it and carry on with in-memory state.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Key holding the combined content fallback snapshot.
pub const CONTENT_KEY: &str = "stagefront-content";
/// Key holding the serialized cart lines.
pub const CART_KEY: &str = "stagefront-cart";
/// Key holding the persisted session.
pub const AUTH_KEY: &str = "stagefront-auth";

/// Errors from local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("stored value is not valid: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage cannot be used at all (bad key, storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String values addressed by key.
pub trait LocalStorage: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the stored text is not valid
/// JSON for `T`, or any error from the backend.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
        .transpose()
}

/// Encode and write a JSON value.
///
/// # Errors
///
/// Returns `StorageError` if encoding or writing fails.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn LocalStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::Unavailable(format!("invalid storage key: {key:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let storage = MemoryStorage::new();
        save_json(&storage, "numbers", &vec![1, 2, 3]).unwrap();

        let back: Option<Vec<i32>> = load_json(&storage, "numbers").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i32>> = load_json(&storage, "other").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_load_json_reports_garbage() {
        let storage = MemoryStorage::new();
        storage.set("numbers", "{not json").unwrap();

        let result: Result<Option<Vec<i32>>, _> = load_json(&storage, "numbers");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key(CART_KEY).is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
