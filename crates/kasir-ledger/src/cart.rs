//! # Active Cart Persistence
//!
//! Saves the in-progress cart so a terminal restart restores the
//! cashier's screen. One key, overwritten on every change.

use std::sync::Arc;

use tracing::debug;

use crate::error::LedgerResult;
use crate::store::{keys, KeyValueStore};
use kasir_core::cart::{Cart, CartItem};

/// Persists the active cart under [`keys::ACTIVE_CART`].
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        CartStore { store }
    }

    /// Writes the current cart lines, replacing any previous snapshot.
    pub async fn save(&self, cart: &Cart) -> LedgerResult<()> {
        debug!(lines = cart.line_count(), "Saving active cart");
        self.store.set(keys::ACTIVE_CART, cart.items()).await?;
        Ok(())
    }

    /// Restores the persisted cart; empty if nothing was saved or the
    /// snapshot is unreadable.
    pub async fn load(&self) -> LedgerResult<Cart> {
        let items: Vec<CartItem> = self.store.get_or_default(keys::ACTIVE_CART).await?;
        Ok(Cart::from_items(items))
    }

    /// Drops the persisted snapshot (checkout completed or cart reset).
    pub async fn clear(&self) -> LedgerResult<()> {
        self.store.remove(keys::ACTIVE_CART).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use kasir_core::money::Money;
    use kasir_core::types::{Category, Product};

    fn product(id: i64, price: i64) -> Product {
        Product {
            id,
            name: format!("Susu {}", id),
            price: Money::from_minor(price),
            category: Category::Susu,
            barcode: String::new(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let cart_store = CartStore::new(Arc::new(MemoryStore::new()));

        let mut cart = Cart::new();
        cart.add_item(&product(1, 50_000), 2).unwrap();
        cart.add_item(&product(2, 12_500), 1).unwrap();
        cart_store.save(&cart).await.unwrap();

        let restored = cart_store.load().await.unwrap();
        assert_eq!(restored, cart);
    }

    #[tokio::test]
    async fn test_load_without_snapshot_is_empty() {
        let cart_store = CartStore::new(Arc::new(MemoryStore::new()));
        assert!(cart_store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_drops_snapshot() {
        let cart_store = CartStore::new(Arc::new(MemoryStore::new()));

        let mut cart = Cart::new();
        cart.add_item(&product(1, 50_000), 1).unwrap();
        cart_store.save(&cart).await.unwrap();

        cart_store.clear().await.unwrap();
        assert!(cart_store.load().await.unwrap().is_empty());
    }
}
