//! Integration tests for Stagefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stagefront-integration-tests
//! ```
//!
//! The suites run in-process against the memory content store and
//! file-backed local storage in a temporary directory, so no database or
//! network is needed.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart scenarios and persistence across restarts
//! - `content_sync` - Loading, fallback, optimistic edits and seeding
//! - `auth_session` - Sign-in, persisted sessions and edit gating

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;
use tempfile::TempDir;

use stagefront_core::UserId;
use stagefront_site::services::auth::StoreLookupVerifier;
use stagefront_site::state::AppState;
use stagefront_site::storage::{FileStorage, LocalStorage};
use stagefront_site::store::{ContentStore, MemoryContentStore, UserRecord};

/// Username of the seeded editor account.
pub const EDITOR: &str = "admin";

/// Password matching [`EDITOR_PASSWORD_HASH`].
pub const EDITOR_PASSWORD: &str = "letmein";

/// Argon2id hash of [`EDITOR_PASSWORD`].
pub const EDITOR_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$8zmnLOYk3FfvWpQFUWOrILXxE89i+jtebrjgbuEAY0o";

/// A site backed by a shared memory store and a temporary data directory.
///
/// Restarting builds a fresh [`AppState`] over the same store and data
/// directory, like reloading the page in the same browser.
pub struct TestSite {
    pub store: Arc<MemoryContentStore>,
    data_dir: TempDir,
}

impl TestSite {
    /// A site whose store has one editor account.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let store = MemoryContentStore::new().with_user(UserRecord {
            id: UserId::new("u-admin"),
            username: EDITOR.to_string(),
            name: Some("Site Admin".to_string()),
        });
        Self {
            store: Arc::new(store),
            data_dir: TempDir::new().expect("create temp data dir"),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Local storage over this site's data directory.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn LocalStorage> {
        Arc::new(FileStorage::new(self.data_dir()))
    }

    /// Build a state without loading anything.
    #[must_use]
    pub fn state(&self) -> AppState {
        let store: Arc<dyn ContentStore> = self.store.clone();
        let verifier = Arc::new(StoreLookupVerifier::new(
            Arc::clone(&store),
            SecretString::from(EDITOR_PASSWORD_HASH),
        ));
        AppState::new(store, self.storage(), verifier)
    }

    /// Build a state, load content and restore the session.
    pub async fn start(&self) -> AppState {
        let state = self.state();
        state.start().await;
        state
    }
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}
