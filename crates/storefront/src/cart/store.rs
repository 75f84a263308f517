//! The cart store: authoritative cart state kept in sync with storage.

use rust_decimal::Decimal;
use tracing::instrument;
use vitrina_core::{CartLineItem, Product, ProductId};

use super::CART_STORAGE_KEY;
use super::events::{CartEvent, Subscribers, SubscriptionId};
use crate::storage::{Storage, StorageError};

/// How the persisted cart looked when the store was constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A saved cart was found; holds the number of line items restored.
    Loaded(usize),
    /// Nothing saved (or storage unreadable); the cart starts empty.
    Empty,
    /// The saved value was not a valid cart; holds the raw value. The cart
    /// starts empty and the bad value is overwritten by the next mutation.
    Corrupt(String),
}

/// Snapshot of the cart taken by [`CartStore::checkout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub items: Vec<CartLineItem>,
    pub total: Decimal,
    pub item_count: u64,
}

/// Shopping cart backed by a [`Storage`].
///
/// Every mutation writes the full cart back under [`CART_STORAGE_KEY`] and
/// then notifies subscribers. Mutations never fail: storage write errors are
/// logged and the in-memory cart stays authoritative.
pub struct CartStore<S> {
    storage: S,
    items: Vec<CartLineItem>,
    subscribers: Subscribers,
}

impl<S: Storage> CartStore<S> {
    /// Create a store, restoring any cart saved in `storage`.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::load(storage).0
    }

    /// Create a store and report how the saved cart was found.
    pub fn load(storage: S) -> (Self, LoadOutcome) {
        let (items, outcome) = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(Some(items)) => {
                    let count = items.len();
                    (items, LoadOutcome::Loaded(count))
                }
                Ok(None) => (Vec::new(), LoadOutcome::Empty),
                Err(e) => {
                    tracing::debug!(error = %e, "Saved cart is not valid JSON");
                    (Vec::new(), LoadOutcome::Corrupt(raw))
                }
            },
            Ok(None) => (Vec::new(), LoadOutcome::Empty),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read saved cart, starting empty");
                (Vec::new(), LoadOutcome::Empty)
            }
        };

        let store = Self {
            storage,
            items,
            subscribers: Subscribers::default(),
        };
        (store, outcome)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line item for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines; zero for an empty cart.
    #[must_use]
    pub fn compute_total(&self) -> Decimal {
        cart_total(&self.items)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same ID is incremented and keeps its stored
    /// product details; otherwise a new line with quantity 1 is appended.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_product(&mut self, product: &Product) {
        let quantity = if let Some(item) = self.items.iter_mut().find(|i| i.id() == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            item.quantity
        } else {
            self.items.push(CartLineItem::new(product.clone()));
            1
        };

        tracing::debug!(quantity, "Product added to cart");
        self.commit(Some(CartEvent::Added {
            id: product.id,
            quantity,
        }));
    }

    /// Adjust the quantity of `id` by `delta`.
    ///
    /// Unknown IDs are ignored. A resulting quantity of zero or less removes
    /// the line.
    #[instrument(skip(self))]
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) {
        let Some(item) = self.items.iter_mut().find(|i| i.id() == id) else {
            tracing::debug!("No cart line for product, ignoring quantity change");
            return;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        let event = if next <= 0 {
            self.items.retain(|i| i.id() != id);
            tracing::debug!("Quantity reached zero, line removed");
            CartEvent::Removed { id }
        } else {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            tracing::debug!(quantity = item.quantity, "Quantity changed");
            CartEvent::QuantityChanged {
                id,
                quantity: item.quantity,
            }
        };

        self.commit(Some(event));
    }

    /// Remove the line for `id`, if present.
    #[instrument(skip(self))]
    pub fn remove_product(&mut self, id: ProductId) {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed = self.items.len() != before;

        if removed {
            tracing::debug!("Line removed from cart");
        }
        self.commit(removed.then_some(CartEvent::Removed { id }));
    }

    /// Empty the cart and delete the saved cart from storage.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.storage.remove(CART_STORAGE_KEY) {
            tracing::error!(error = %e, "Failed to delete saved cart");
        }
        tracing::debug!("Cart cleared");
        self.subscribers.notify(&CartEvent::Cleared, &self.items);
    }

    /// Finalize the purchase: snapshot the cart, then clear it.
    ///
    /// Returns `None` and leaves everything untouched when the cart is empty.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Option<Receipt> {
        if self.items.is_empty() {
            return None;
        }

        let receipt = Receipt {
            total: self.compute_total(),
            item_count: self.item_count(),
            items: self.items.clone(),
        };
        tracing::info!(
            lines = receipt.items.len(),
            total = %receipt.total,
            "Checkout completed"
        );

        self.clear();
        Some(receipt)
    }

    /// Write the current cart under [`CART_STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be encoded or written.
    pub fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.set(CART_STORAGE_KEY, &json)
    }

    /// Register a listener called after every effective mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CartEvent, &[CartLineItem]) + 'static,
    ) -> SubscriptionId {
        self.subscribers.add(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn commit(&mut self, event: Option<CartEvent>) {
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, key = CART_STORAGE_KEY, "Failed to persist cart");
        }
        if let Some(event) = event {
            self.subscribers.notify(&event, &self.items);
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("items", &self.items)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

/// Sum of `price * quantity` over `items`.
///
/// Listeners only see the line items, so this is shared with front ends that
/// render a total from a [`CartEvent`] callback.
#[must_use]
pub fn cart_total(items: &[CartLineItem]) -> Decimal {
    items.iter().map(CartLineItem::line_total).sum()
}

/// Parse a saved cart.
///
/// `null` counts as no cart. Lines with quantity 0 and repeated product IDs
/// (after the first) are dropped.
fn decode(raw: &str) -> Result<Option<Vec<CartLineItem>>, serde_json::Error> {
    let Some(saved) = serde_json::from_str::<Option<Vec<CartLineItem>>>(raw)? else {
        return Ok(None);
    };

    let mut items: Vec<CartLineItem> = Vec::with_capacity(saved.len());
    for item in saved {
        if item.quantity == 0 || items.iter().any(|kept| kept.id() == item.id()) {
            tracing::warn!(product_id = %item.id(), "Dropping invalid saved cart line");
            continue;
        }
        items.push(item);
    }
    Ok(Some(items))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            price: Decimal::new(price, 0),
            image: format!("img/{id}.jpg"),
            description: String::new(),
        }
    }

    fn quantities<S: Storage>(store: &CartStore<S>) -> Vec<(i32, u32)> {
        store
            .items()
            .iter()
            .map(|item| (item.id().as_i32(), item.quantity))
            .collect()
    }

    #[test]
    fn test_add_same_product_twice() {
        let mut store = CartStore::new(MemoryStorage::new());
        let p = product(1, 100);

        store.add_product(&p);
        store.add_product(&p);

        assert_eq!(quantities(&store), vec![(1, 2)]);
        assert_eq!(store.compute_total(), Decimal::new(200, 0));
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_product(&product(1, 50));

        store.change_quantity(ProductId::new(1), -1);

        assert!(store.is_empty());
        assert_eq!(store.compute_total(), Decimal::ZERO);
    }

    #[test]
    fn test_remove_keeps_remaining_lines() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_product(&product(1, 10));
        store.add_product(&product(2, 20));

        store.remove_product(ProductId::new(1));

        assert_eq!(quantities(&store), vec![(2, 1)]);
        assert_eq!(store.compute_total(), Decimal::new(20, 0));
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "{bad").unwrap();

        let (store, outcome) = CartStore::load(storage);

        assert!(store.is_empty());
        assert_eq!(outcome, LoadOutcome::Corrupt("{bad".to_string()));
    }

    #[test]
    fn test_absent_and_null_storage_load_empty() {
        let (_, outcome) = CartStore::load(MemoryStorage::new());
        assert_eq!(outcome, LoadOutcome::Empty);

        let storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "null").unwrap();
        let (store, outcome) = CartStore::load(storage);
        assert!(store.is_empty());
        assert_eq!(outcome, LoadOutcome::Empty);
    }

    #[test]
    fn test_change_quantity_keeps_other_fields() {
        let mut store = CartStore::new(MemoryStorage::new());
        let p = product(7, 15);
        store.add_product(&p);

        store.change_quantity(ProductId::new(7), 4);

        let item = store.get(ProductId::new(7)).unwrap();
        assert_eq!(item.quantity, 5);
        assert_eq!(item.product, p);
    }

    #[test]
    fn test_large_negative_delta_removes_line() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_product(&product(1, 10));
        store.add_product(&product(1, 10));

        store.change_quantity(ProductId::new(1), -5);
        assert!(store.get(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_change_quantity_unknown_id_does_not_persist() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());

        store.change_quantity(ProductId::new(99), 1);

        assert!(store.is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_unknown_id_still_persists() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());

        store.remove_product(ProductId::new(99));

        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_existing_line_keeps_first_details() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_product(&product(1, 10));

        let mut repriced = product(1, 99);
        repriced.name = "Renamed".to_string();
        store.add_product(&repriced);

        let item = store.get(ProductId::new(1)).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.product.price, Decimal::new(10, 0));
        assert_eq!(item.product.name, "Producto 1");
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());

        store.add_product(&product(1, 10));
        store.add_product(&product(2, 20));
        store.change_quantity(ProductId::new(2), 2);

        let (reloaded, outcome) = CartStore::load(storage);
        assert_eq!(outcome, LoadOutcome::Loaded(2));
        assert_eq!(reloaded.items(), store.items());
        assert_eq!(quantities(&reloaded), vec![(1, 1), (2, 3)]);
    }

    #[test]
    fn test_clear_deletes_key() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());
        store.add_product(&product(1, 10));
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_some());

        store.clear();

        assert!(store.is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
        assert!(CartStore::new(storage).is_empty());
    }

    #[test]
    fn test_item_count() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_product(&product(1, 10));
        store.add_product(&product(1, 10));
        store.add_product(&product(2, 20));
        assert_eq!(store.item_count(), 3);
    }

    #[test]
    fn test_checkout() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());
        assert_eq!(store.checkout(), None);

        store.add_product(&product(1, 10));
        store.add_product(&product(2, 25));
        store.change_quantity(ProductId::new(2), 1);

        let receipt = store.checkout().unwrap();
        assert_eq!(receipt.total, Decimal::new(60, 0));
        assert_eq!(receipt.item_count, 3);
        assert_eq!(receipt.items.len(), 2);
        assert!(store.is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_checkout_empty_cart_leaves_storage_alone() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());
        store.remove_product(ProductId::new(1));
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));

        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        assert_eq!(store.checkout(), None);
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(*events.borrow(), 0);
    }

    #[test]
    fn test_cart_total_matches_store_total() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_product(&product(1, 10));
        store.add_product(&product(2, 25));
        store.change_quantity(ProductId::new(2), 2);

        assert_eq!(cart_total(store.items()), Decimal::new(85, 0));
        assert_eq!(cart_total(store.items()), store.compute_total());
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_decode_drops_duplicates_and_zero_quantities() {
        let raw = r#"[
            {"id": 1, "name": "A", "price": 10, "quantity": 2},
            {"id": 2, "name": "B", "price": 20, "quantity": 0},
            {"id": 1, "name": "A again", "price": 10, "quantity": 5}
        ]"#;

        let items = decode(raw).unwrap().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.name, "A");
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_negative_saved_quantity_is_corrupt() {
        let storage = MemoryStorage::new();
        let raw = r#"[{"id": 1, "name": "A", "price": 10, "quantity": -1}]"#;
        storage.set(CART_STORAGE_KEY, raw).unwrap();

        let (store, outcome) = CartStore::load(storage);
        assert!(store.is_empty());
        assert_eq!(outcome, LoadOutcome::Corrupt(raw.to_string()));
    }

    #[test]
    fn test_subscribers_receive_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = CartStore::new(MemoryStorage::new());
        let sink = Rc::clone(&events);
        let subscription = store.subscribe(move |event, items| {
            sink.borrow_mut().push((*event, items.len()));
        });

        store.add_product(&product(1, 10));
        store.add_product(&product(1, 10));
        store.change_quantity(ProductId::new(1), -1);
        store.change_quantity(ProductId::new(42), 1);
        store.remove_product(ProductId::new(42));
        store.change_quantity(ProductId::new(1), -1);
        store.clear();

        let id = ProductId::new(1);
        assert_eq!(
            *events.borrow(),
            vec![
                (CartEvent::Added { id, quantity: 1 }, 1),
                (CartEvent::Added { id, quantity: 2 }, 1),
                (CartEvent::QuantityChanged { id, quantity: 1 }, 1),
                (CartEvent::Removed { id }, 0),
                (CartEvent::Cleared, 0),
            ]
        );

        assert!(store.unsubscribe(subscription));
        store.add_product(&product(2, 20));
        assert_eq!(events.borrow().len(), 5);
    }
}
