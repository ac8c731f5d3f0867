//! Cart Store

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use slotmap::{SlotMap, new_key_type};
use tracing::{debug, warn};

use crate::{
    cart::{
        items::{CartItem, NewCartItem},
        state::CartState,
    },
    products::ProductId,
    storage::SessionStorage,
};

/// Session storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "cart";

new_key_type! {
    /// Handle returned by [`CartStore::subscribe`].
    pub struct SubscriptionKey;
}

type Subscriber = Box<dyn FnMut(&Arc<CartState>)>;

/// Shopping cart store.
///
/// Owns the cart state, persists it to session storage after every mutation
/// and publishes each new snapshot to subscribers before the mutating call
/// returns. Storage failures are logged and never surface to callers.
pub struct CartStore<S> {
    storage: S,
    state: Arc<CartState>,
    subscribers: SlotMap<SubscriptionKey, Subscriber>,
}

impl<S: SessionStorage> CartStore<S> {
    /// Create an empty store over the given storage.
    ///
    /// Nothing is read from storage until [`CartStore::hydrate_from_session`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: Arc::new(CartState::new()),
            subscribers: SlotMap::with_key(),
        }
    }

    /// Replace the cart with the snapshot persisted in session storage.
    ///
    /// A missing, unreadable or malformed snapshot leaves the cart untouched.
    pub fn hydrate_from_session(&mut self) {
        let saved = match self.storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                debug!("no cart snapshot in session storage");
                return;
            }
            Err(error) => {
                warn!("failed to restore cart from session storage: {error}");
                return;
            }
        };

        match CartState::from_json(&saved) {
            Ok(restored) => {
                debug!(
                    lines = restored.unique_items_count(),
                    "restored cart from session storage"
                );
                self.state = Arc::new(restored);
                self.notify();
            }
            Err(error) => warn!("ignoring malformed cart snapshot: {error}"),
        }
    }

    /// Write the current lines to session storage.
    ///
    /// A failed write is logged; the in-memory cart stays authoritative.
    pub fn persist(&self) {
        let json = match self.state.to_json() {
            Ok(json) => json,
            Err(error) => {
                warn!("failed to serialize cart: {error}");
                return;
            }
        };

        if let Err(error) = self.storage.set_item(CART_STORAGE_KEY, &json) {
            warn!("failed to save cart to session storage: {error}");
        }
    }

    /// Add one unit of a product.
    pub fn add_item(&mut self, product: impl Into<NewCartItem>) {
        Arc::make_mut(&mut self.state).add(product.into());
        self.commit();
    }

    /// Remove `quantity_to_remove` units of a product.
    ///
    /// The line is dropped once its quantity would reach zero. Unknown ids
    /// are ignored.
    pub fn remove_item(&mut self, id: &ProductId, quantity_to_remove: u32) {
        if !self.state.has_item(id) {
            debug!("remove ignored, {id} is not in the cart");
            return;
        }

        Arc::make_mut(&mut self.state).remove(id, quantity_to_remove);
        self.commit();
    }

    /// Remove a single unit of a product.
    pub fn remove_one(&mut self, id: &ProductId) {
        self.remove_item(id, 1);
    }

    /// Set a product's quantity exactly.
    ///
    /// A quantity of zero drops the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, new_quantity: u32) {
        if !self.state.has_item(id) {
            debug!("update ignored, {id} is not in the cart");
            return;
        }

        let state = Arc::make_mut(&mut self.state);

        if new_quantity < 1 {
            state.remove_line(id);
        } else {
            state.set_quantity(id, new_quantity);
        }

        self.commit();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        Arc::make_mut(&mut self.state).clear();
        self.commit();
    }

    /// Check whether a product is in the cart.
    pub fn has_item(&self, id: &ProductId) -> bool {
        self.state.has_item(id)
    }

    /// Cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        self.state.items()
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// Cart total rounded to two decimal places.
    pub fn total_price(&self) -> Decimal {
        self.state.total_price()
    }

    /// Check whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn unique_items_count(&self) -> usize {
        self.state.unique_items_count()
    }

    /// The current immutable snapshot.
    pub fn snapshot(&self) -> Arc<CartState> {
        Arc::clone(&self.state)
    }

    /// Register a callback invoked with every new snapshot.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&Arc<CartState>) + 'static,
    ) -> SubscriptionKey {
        self.subscribers.insert(Box::new(subscriber))
    }

    /// Drop a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.remove(key).is_some()
    }

    /// The backing session storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = Arc::clone(&self.state);

        for subscriber in self.subscribers.values_mut() {
            subscriber(&snapshot);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use testresult::TestResult;

    use crate::storage::{MemoryStorage, MockSessionStorage, StorageError};

    use super::*;

    fn product(id: u64, price: Decimal) -> NewCartItem {
        NewCartItem {
            id: ProductId::from(id),
            title: format!("Product {id}"),
            price,
            image: Some(format!("https://example.test/{id}.png")),
        }
    }

    fn recording_store() -> (CartStore<MemoryStorage>, Rc<RefCell<Vec<u64>>>) {
        let mut store = CartStore::new(MemoryStorage::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        store.subscribe(move |state| sink.borrow_mut().push(state.total_items()));

        (store, seen)
    }

    #[test]
    fn subscribers_see_each_mutation() {
        let (mut store, seen) = recording_store();
        let id = ProductId::from(1);

        store.add_item(product(1, Decimal::ONE));
        store.add_item(product(1, Decimal::ONE));
        store.update_quantity(&id, 5);
        store.remove_item(&id, 2);
        store.clear_cart();

        assert_eq!(*seen.borrow(), [1, 2, 5, 3, 0]);
    }

    #[test]
    fn no_op_mutations_do_not_notify_or_persist() {
        let (mut store, seen) = recording_store();
        let id = ProductId::from(404);

        store.remove_item(&id, 1);
        store.update_quantity(&id, 3);
        store.update_quantity(&id, 0);

        assert!(seen.borrow().is_empty());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn removing_zero_units_still_persists_and_notifies() -> TestResult {
        let (mut store, seen) = recording_store();
        let id = ProductId::from(1);

        store.add_item(product(1, Decimal::ONE));
        store.add_item(product(1, Decimal::ONE));
        store.storage().remove_item(CART_STORAGE_KEY)?;

        store.remove_item(&id, 0);

        assert_eq!(store.state.get(&id).map(|item| item.quantity), Some(2));
        assert_eq!(*seen.borrow(), [1, 2, 2]);

        let saved = store.storage().get_item(CART_STORAGE_KEY)?.unwrap_or_default();

        assert_eq!(CartState::from_json(&saved)?.total_items(), 2);

        Ok(())
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let (mut store, seen) = recording_store();
        let extra = Rc::new(RefCell::new(0_u32));
        let sink = Rc::clone(&extra);

        let key = store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.add_item(product(1, Decimal::ONE));

        assert!(store.unsubscribe(key));
        assert!(!store.unsubscribe(key));

        store.add_item(product(2, Decimal::ONE));

        assert_eq!(*extra.borrow(), 1);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn published_snapshots_are_immutable() {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(1, Decimal::ONE));

        let before = store.snapshot();

        store.add_item(product(2, Decimal::ONE));

        assert_eq!(before.unique_items_count(), 1);
        assert_eq!(store.unique_items_count(), 2);
    }

    #[test]
    fn every_mutation_persists() -> TestResult {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());

        store.add_item(product(1, Decimal::new(250, 2)));

        let saved = storage.get_item(CART_STORAGE_KEY)?.unwrap_or_default();

        assert_eq!(CartState::from_json(&saved)?.total_price(), Decimal::new(250, 2));

        store.clear_cart();

        assert_eq!(storage.get_item(CART_STORAGE_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn failed_writes_keep_memory_state() {
        let mut storage = MockSessionStorage::new();

        storage
            .expect_set_item()
            .times(3)
            .returning(|_, _| Err(StorageError::QuotaExceeded));

        let mut store = CartStore::new(storage);

        store.add_item(product(1, Decimal::TEN));
        store.add_item(product(1, Decimal::TEN));
        store.add_item(product(2, Decimal::ONE));

        assert_eq!(store.total_items(), 3);
        assert_eq!(store.total_price(), Decimal::new(21, 0));
    }

    #[test]
    fn hydrate_notifies_once_with_restored_totals() -> TestResult {
        let storage = MemoryStorage::new();
        storage.set_item(
            CART_STORAGE_KEY,
            r#"[
                {"id": 1, "title": "A", "price": 2.5, "image": "", "quantity": 2},
                {"id": 2, "title": "B", "price": 0.1, "image": "", "quantity": 1}
            ]"#,
        )?;

        let mut store = CartStore::new(storage);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        store.subscribe(move |state| {
            sink.borrow_mut()
                .push((state.total_items(), state.total_price()));
        });

        store.hydrate_from_session();

        assert_eq!(*seen.borrow(), [(3, Decimal::new(510, 2))]);

        Ok(())
    }

    #[test]
    fn hydrate_ignores_unreadable_storage() {
        let mut storage = MockSessionStorage::new();

        storage
            .expect_get_item()
            .times(1)
            .returning(|_| Err(StorageError::Unavailable));

        let mut store = CartStore::new(storage);

        store.hydrate_from_session();

        assert!(store.is_empty());
    }

    #[test]
    fn hydrate_ignores_malformed_snapshot() -> TestResult {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "{not json")?;

        let mut store = CartStore::new(storage);
        let seen = Rc::new(RefCell::new(0_u32));
        let sink = Rc::clone(&seen);

        store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.hydrate_from_session();

        assert!(store.is_empty());
        assert_eq!(*seen.borrow(), 0);

        Ok(())
    }

    #[test]
    fn hydrate_ignores_schema_mismatch() -> TestResult {
        let storage = MemoryStorage::new();
        storage.set_item(
            CART_STORAGE_KEY,
            r#"[{"id": 1, "title": "A", "price": 1.5, "image": "", "quantity": 0}]"#,
        )?;

        let mut store = CartStore::new(storage);

        store.hydrate_from_session();

        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn hydrate_accepts_string_ids() -> TestResult {
        let storage = MemoryStorage::new();
        storage.set_item(
            CART_STORAGE_KEY,
            r#"[{"id": "sku-1", "title": "A", "price": 1.5, "image": "", "quantity": 2}]"#,
        )?;

        let mut store = CartStore::new(storage);

        store.hydrate_from_session();

        assert!(store.has_item(&ProductId::from("sku-1")));
        assert_eq!(store.total_price(), Decimal::new(300, 2));

        Ok(())
    }
}
