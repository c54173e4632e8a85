//! Persisted cart engine.
//!
//! Wraps the pure [`Cart`] aggregate with view flags, an observable state
//! channel and local persistence. Every change to the lines is written back
//! under [`CART_KEY`]; storage failures are logged and the cart keeps
//! working in memory.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::instrument;

use stagefront_core::content::MerchItem;
use stagefront_core::{Cart, CartLine, CartLineId, Price};

use crate::storage::{CART_KEY, LocalStorage, load_json, save_json};

/// Everything a cart view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub cart: Cart,
    /// Whether the cart drawer is shown.
    pub is_open: bool,
    /// Set by checkout, cleared when the confirmation is dismissed.
    pub checkout_complete: bool,
}

/// The shopping cart service.
pub struct CartEngine {
    storage: Arc<dyn LocalStorage>,
    state: watch::Sender<CartState>,
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CartEngine {
    /// Load the persisted cart.
    ///
    /// Unreadable or corrupt data is logged and treated as an empty cart.
    #[must_use]
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let cart = match load_json::<Vec<CartLine>>(storage.as_ref(), CART_KEY) {
            Ok(Some(lines)) => Cart::from_lines(lines),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved cart, starting empty");
                Cart::new()
            }
        };

        let (state, _) = watch::channel(CartState {
            cart,
            ..CartState::default()
        });
        Self { storage, state }
    }

    /// Add one unit of a product and open the cart.
    ///
    /// Stock and size are not checked here; the product card decides what
    /// can be added.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub fn add_to_cart(&self, product: &MerchItem, size: Option<&str>) -> CartLineId {
        let now = Utc::now().timestamp_millis();
        let mut added = None;
        self.state.send_modify(|state| {
            added = Some(state.cart.add(product, size, now));
            state.is_open = true;
        });
        self.persist();
        added.unwrap_or_else(|| unreachable!("send_modify runs its closure exactly once"))
    }

    /// Set a line's quantity; zero or less removes the line. Values above
    /// `u32::MAX` are stored as `u32::MAX`.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, id: &CartLineId, quantity: i64) {
        let changed = self
            .state
            .send_if_modified(|state| state.cart.update_quantity(id, quantity));
        if changed {
            self.persist();
        }
    }

    /// Remove a line. Unknown IDs are ignored.
    #[instrument(skip(self))]
    pub fn remove_item(&self, id: &CartLineId) {
        if self.state.send_if_modified(|state| state.cart.remove(id)) {
            self.persist();
        }
    }

    /// Complete the (simulated) purchase.
    ///
    /// Raises the confirmation flag, closes the cart and empties it in one
    /// state change.
    #[instrument(skip(self))]
    pub fn checkout(&self) {
        self.state.send_modify(|state| {
            state.checkout_complete = true;
            state.is_open = false;
            state.cart.clear();
        });
        self.persist();
        tracing::info!("Checkout complete");
    }

    /// Dismiss the checkout confirmation.
    pub fn close_checkout_confirmation(&self) {
        self.state.send_if_modified(|state| {
            std::mem::replace(&mut state.checkout_complete, false)
        });
    }

    pub fn open_cart(&self) {
        self.state
            .send_if_modified(|state| !std::mem::replace(&mut state.is_open, true));
    }

    pub fn close_cart(&self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.is_open, false));
    }

    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.state.borrow().cart.lines().to_vec()
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.state.borrow().cart.total()
    }

    /// Units across all lines (the badge on the cart icon).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.borrow().cart.item_count()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open
    }

    #[must_use]
    pub fn is_checkout_complete(&self) -> bool {
        self.state.borrow().checkout_complete
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Watch the cart for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    fn persist(&self) {
        let lines = self.state.borrow().cart.lines().to_vec();
        if let Err(e) = save_json(self.storage.as_ref(), CART_KEY, &lines) {
            tracing::warn!(error = %e, "Failed to save cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stagefront_core::content::defaults;

    use super::*;
    use crate::storage::MemoryStorage;

    fn tee() -> MerchItem {
        defaults::merch().into_iter().next().unwrap()
    }

    fn engine(storage: &Arc<MemoryStorage>) -> CartEngine {
        CartEngine::load(Arc::clone(storage) as Arc<dyn LocalStorage>)
    }

    #[test]
    fn test_add_opens_cart_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = engine(&storage);

        cart.add_to_cart(&tee(), Some("M"));

        assert!(cart.is_open());
        assert_eq!(cart.item_count(), 1);
        let saved = storage.get(CART_KEY).unwrap().unwrap();
        assert!(saved.contains("\"merchId\":\"m1\""));
    }

    #[test]
    fn test_reload_preserves_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let first = engine(&storage);
        first.add_to_cart(&tee(), Some("M"));
        first.add_to_cart(&tee(), Some("L"));
        first.add_to_cart(&tee(), Some("M"));

        let second = engine(&storage);
        assert_eq!(second.lines(), first.lines());
        assert!(!second.is_open());
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CART_KEY, "{{{").unwrap();

        let cart = engine(&storage);
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_failing(true);

        let cart = engine(&storage);
        cart.add_to_cart(&tee(), None);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_checkout_on_empty_cart_only_raises_signal() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = engine(&storage);
        cart.open_cart();

        cart.checkout();

        assert!(cart.is_checkout_complete());
        assert!(!cart.is_open());
        assert!(cart.lines().is_empty());

        cart.close_checkout_confirmation();
        assert!(!cart.is_checkout_complete());
    }

    #[test]
    fn test_checkout_clears_persisted_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = engine(&storage);
        cart.add_to_cart(&tee(), Some("S"));

        cart.checkout();

        assert!(engine(&storage).lines().is_empty());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = engine(&storage);
        let mut rx = cart.subscribe();
        rx.mark_unchanged();

        let id = cart.add_to_cart(&tee(), Some("S"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().cart.lines()[0].id, id);

        cart.remove_item(&CartLineId::new("missing"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_toggle_flags() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = engine(&storage);

        cart.open_cart();
        assert!(cart.is_open());
        cart.close_cart();
        assert!(!cart.is_open());
    }
}
