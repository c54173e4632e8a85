//! Application state shared by a host.

use std::sync::Arc;

use tracing::instrument;

use stagefront_core::content::{SectionContent, SectionPatch, find_item};
use stagefront_core::{CartLineId, ProductId};

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::services::auth::{self, AuthGate, CredentialVerifier};
use crate::services::cart::CartEngine;
use crate::services::content::{ContentSync, SeedReport};
use crate::storage::{FileStorage, LocalStorage};
use crate::store::{self, ContentStore};

/// The site's services, wired together.
///
/// This struct is cheaply cloneable via `Arc`. Services are explicit
/// handles; views read them through their `subscribe` channels.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn ContentStore>,
    content: ContentSync,
    cart: CartEngine,
    auth: AuthGate,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("content", &self.inner.content)
            .field("cart", &self.inner.cart)
            .field("auth", &self.inner.auth)
            .finish()
    }
}

impl AppState {
    /// Wire services over explicit backends.
    #[must_use]
    pub fn new(
        store: Arc<dyn ContentStore>,
        storage: Arc<dyn LocalStorage>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let content = ContentSync::new(Arc::clone(&store), Arc::clone(&storage));
        let cart = CartEngine::load(Arc::clone(&storage));
        let auth = AuthGate::new(verifier, storage);

        Self {
            inner: Arc::new(AppStateInner {
                store,
                content,
                cart,
                auth,
            }),
        }
    }

    /// Build backends from configuration, then load content and restore any
    /// persisted session.
    ///
    /// # Errors
    ///
    /// Returns `SiteError` if a backend cannot be constructed. An unreachable
    /// store at load time is not an error; content falls back locally.
    pub async fn from_config(config: &SiteConfig) -> Result<Self> {
        let store = store::connect(&config.store).await?;
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&config.data_dir));
        let verifier = auth::verifier_from_config(&config.auth, Arc::clone(&store))?;

        let state = Self::new(store, storage, verifier);
        state.start().await;
        Ok(state)
    }

    /// Load content and restore the session.
    pub async fn start(&self) {
        let source = self.content().initialize().await;
        let signed_in = self.auth().restore().await;
        tracing::debug!(?source, signed_in, "Site state ready");
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn content(&self) -> &ContentSync {
        &self.inner.content
    }

    #[must_use]
    pub fn cart(&self) -> &CartEngine {
        &self.inner.cart
    }

    #[must_use]
    pub fn auth(&self) -> &AuthGate {
        &self.inner.auth
    }

    /// Apply an edit on behalf of the signed-in editor.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotAuthenticated` if no editor is signed in. A
    /// failed remote write is not an error; see [`ContentSync::update_section`].
    #[instrument(skip(self, patch), fields(section = %patch.section()))]
    pub async fn edit_section(&self, patch: SectionPatch) -> Result<SectionContent> {
        self.require_editor()?;
        Ok(self.content().update_section(patch).await)
    }

    /// Push all current content to the store on behalf of the signed-in editor.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotAuthenticated` if no editor is signed in, or
    /// `SiteError::Seed` naming the section that failed.
    pub async fn seed(&self) -> Result<SeedReport> {
        self.require_editor()?;
        Ok(self.content().seed_remote().await?)
    }

    /// Add a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` if the merch section has no such product.
    pub fn add_to_cart(&self, product_id: &ProductId, size: Option<&str>) -> Result<CartLineId> {
        let content = self.content().content();
        let product = find_item(&content.merch, product_id)
            .ok_or_else(|| SiteError::NotFound(format!("product {product_id}")))?;
        Ok(self.cart().add_to_cart(product, size))
    }

    fn require_editor(&self) -> Result<()> {
        if self.auth().is_authenticated() {
            Ok(())
        } else {
            Err(SiteError::NotAuthenticated)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use stagefront_core::UserId;
    use stagefront_core::content::{ContactPatch, SiteContent};

    use super::*;
    use crate::services::auth::{StoreLookupVerifier, hash_password};
    use crate::storage::MemoryStorage;
    use crate::store::{MemoryContentStore, UserRecord};

    fn state() -> AppState {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new().with_user(UserRecord {
            id: UserId::new("u1"),
            username: "admin".to_string(),
            name: None,
        }));
        let verifier = Arc::new(StoreLookupVerifier::new(
            Arc::clone(&store),
            SecretString::from(hash_password("letmein").unwrap()),
        ));
        AppState::new(store, Arc::new(MemoryStorage::new()), verifier)
    }

    fn phone(number: &str) -> SectionPatch {
        SectionPatch::Contact(ContactPatch {
            phone: Some(number.to_string()),
            ..ContactPatch::default()
        })
    }

    #[tokio::test]
    async fn test_edit_requires_sign_in() {
        let state = state();
        state.start().await;

        let result = state.edit_section(phone("1")).await;
        assert!(matches!(result, Err(SiteError::NotAuthenticated)));
        assert_eq!(state.content().content(), SiteContent::default());

        assert!(state.auth().login("admin", "letmein").await);
        state.edit_section(phone("1")).await.unwrap();
        assert_eq!(state.content().content().contact.phone, "1");
    }

    #[tokio::test]
    async fn test_seed_requires_sign_in() {
        let state = state();
        assert!(matches!(state.seed().await, Err(SiteError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_add_to_cart_by_product_id() {
        let state = state();
        state.start().await;

        let id = state.add_to_cart(&ProductId::new("m2"), Some("XL")).unwrap();
        assert_eq!(id.as_str().split('-').take(2).collect::<Vec<_>>(), ["m2", "XL"]);
        assert!(matches!(
            state.add_to_cart(&ProductId::new("nope"), None),
            Err(SiteError::NotFound(_))
        ));
    }
}
