//! Observable cart store.
//!
//! [`CartStore`] owns a visitor's [`Cart`] inside a `watch` channel. Every
//! operation runs under the channel's lock, so concurrent requests from the
//! same visitor cannot lose updates. Subscribers are only woken when an
//! operation actually changed the cart.

use tokio::sync::watch;
use tracing::debug;

use shopsmart_core::{Cart, Product, ProductId};

/// A visitor's cart plus change notification.
#[derive(Debug)]
pub struct CartStore {
    tx: watch::Sender<Cart>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(Cart::new()),
        }
    }

    /// Add one unit of a product. Returns the line's new quantity.
    pub fn add_to_cart(&self, product: &Product) -> u32 {
        let mut quantity = 0;
        self.tx.send_modify(|cart| quantity = cart.add(product));
        debug!(product_id = %product.id, quantity, "Added to cart");
        quantity
    }

    /// Remove a product's line. Absent lines are a no-op.
    pub fn remove_from_cart(&self, id: ProductId) -> bool {
        self.tx.send_if_modified(|cart| cart.remove(id))
    }

    /// Set a line's quantity. Zero removes the line; absent lines are a no-op.
    pub fn update_cart_quantity(&self, id: ProductId, quantity: u32) -> bool {
        self.tx.send_if_modified(|cart| cart.set_quantity(id, quantity))
    }

    pub fn increase_quantity(&self, id: ProductId) -> bool {
        self.tx.send_if_modified(|cart| cart.increment(id))
    }

    /// Take one from a line, removing it at quantity one.
    pub fn decrease_quantity(&self, id: ProductId) -> bool {
        self.tx.send_if_modified(|cart| cart.decrement(id))
    }

    pub fn clear_cart(&self) -> bool {
        self.tx.send_if_modified(Cart::clear)
    }

    /// Atomically take the whole cart, leaving it empty.
    ///
    /// Returns `None` without notifying if the cart was already empty.
    pub fn take(&self) -> Option<Cart> {
        let mut taken = None;
        self.tx.send_if_modified(|cart| {
            if cart.is_empty() {
                return false;
            }
            taken = Some(std::mem::take(cart));
            true
        });
        taken
    }

    /// Copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.tx.borrow().clone()
    }

    /// Receive every future change to the cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            description: String::new(),
            images: vec![],
            category_id: None,
            category: None,
        }
    }

    #[test]
    fn test_add_twice_increments() {
        let store = CartStore::new();
        assert_eq!(store.add_to_cart(&product(1, 1000)), 1);
        assert_eq!(store.add_to_cart(&product(1, 1000)), 2);

        let cart = store.snapshot();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total().display(), "$20.00");
    }

    #[test]
    fn test_update_to_zero_removes() {
        let store = CartStore::new();
        store.add_to_cart(&product(1, 500));
        store.add_to_cart(&product(2, 700));

        assert!(store.update_cart_quantity(ProductId::new(1), 0));
        let cart = store.snapshot();
        assert!(cart.line(ProductId::new(1)).is_none());
        assert_eq!(cart.line(ProductId::new(2)).unwrap().quantity, 1);
    }

    #[test]
    fn test_decrease_at_one_removes() {
        let store = CartStore::new();
        store.add_to_cart(&product(3, 500));
        assert!(store.decrease_quantity(ProductId::new(3)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_increase_missing_line_is_noop() {
        let store = CartStore::new();
        assert!(!store.increase_quantity(ProductId::new(9)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_subscriber_sees_changes_but_not_noops() {
        let store = CartStore::new();
        let mut rx = store.subscribe();

        store.add_to_cart(&product(1, 100));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count(), 1);

        assert!(!store.remove_from_cart(ProductId::new(42)));
        assert!(!rx.has_changed().unwrap());

        assert!(store.remove_from_cart(ProductId::new(1)));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_clear_empty_cart_does_not_notify() {
        let store = CartStore::new();
        let rx = store.subscribe();
        assert!(!store.clear_cart());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_take_empties_cart() {
        let store = CartStore::new();
        assert!(store.take().is_none());

        store.add_to_cart(&product(1, 250));
        store.add_to_cart(&product(2, 250));
        let taken = store.take().unwrap();
        assert_eq!(taken.item_count(), 2);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let store = Arc::new(CartStore::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add_to_cart(&product(1, 100));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.snapshot().line(ProductId::new(1)).unwrap().quantity, 50);
    }
}
