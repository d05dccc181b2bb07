//! # Cart
//!
//! The in-progress cart: what the cashier has rung up but not yet charged.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                │
//! │                                                                     │
//! │  Caller Action              Cart Change                             │
//! │  ─────────────              ───────────                             │
//! │  Scan / tap product ──────► add_item: merge by product id           │
//! │  +/- buttons ─────────────► adjust_quantity: line dropped at ≤ 0    │
//! │  Type a quantity ─────────► set_quantity: 0 removes the line        │
//! │  Remove button ───────────► remove_item                             │
//! │  Checkout done / reset ───► clear                                   │
//! │                                                                     │
//! │  Lines are unique by product id; each line freezes the product      │
//! │  snapshot (name, price) at the moment it was first added.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;
use crate::types::{Category, Product, ProductId};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// One cart line: a product snapshot plus a positive quantity.
///
/// ## Price Freezing
/// Name and price are captured when the line is created. If the catalog
/// changes afterwards, the line (and the receipt built from it) keeps the
/// original values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub price: Money,

    #[serde(default)]
    pub category: Category,

    /// Barcode snapshot, for reprint/lookup convenience.
    #[serde(default)]
    pub barcode: String,

    /// Units of this product in the cart; always > 0.
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart line from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            barcode: product.barcode.clone(),
            quantity,
        }
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges)
/// - Quantity is always > 0 (dropping to zero removes the line)
/// - At most [`MAX_CART_ITEMS`] lines, [`MAX_ITEM_QUANTITY`] units per line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from a persisted line snapshot (restore-on-launch).
    ///
    /// The snapshot is untrusted: lines whose quantity falls outside
    /// `1..=MAX_ITEM_QUANTITY` are dropped rather than restored, and the
    /// cart is truncated to [`MAX_CART_ITEMS`] lines, so a hand-edited or
    /// stale snapshot cannot violate the cart invariants.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut items: Vec<CartItem> = items
            .into_iter()
            .filter(|i| i.quantity > 0 && i.quantity <= MAX_ITEM_QUANTITY)
            .collect();
        items.truncate(MAX_CART_ITEMS);
        Cart { items }
    }

    /// Adds a product to the cart, merging with an existing line.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CoreError> {
        crate::validation::validate_quantity(quantity)?;

        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets a line's quantity outright. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CoreError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        if quantity < 0 || quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotInCart(product_id)),
        }
    }

    /// Adjusts a line's quantity by a signed delta (the +/- buttons).
    ///
    /// Dropping to zero or below removes the line, matching the original
    /// cart behavior.
    pub fn adjust_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<(), CoreError> {
        let line = self
            .items
            .iter()
            .find(|i| i.product_id == product_id)
            .ok_or(CoreError::ProductNotInCart(product_id))?;

        let new_qty = line.quantity + delta;
        if new_qty <= 0 {
            return self.remove_item(product_id);
        }
        self.set_quantity(product_id, new_qty)
    }

    /// Removes a line by product id.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CoreError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == before {
            Err(CoreError::ProductNotInCart(product_id))
        } else {
            Ok(())
        }
    }

    /// Clears all lines (checkout completion or explicit reset).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The cart lines, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal before tax.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn susu(id: ProductId, price: i64) -> Product {
        Product {
            id,
            name: format!("Susu {}", id),
            price: Money::from_minor(price),
            category: Category::Susu,
            barcode: format!("899000000000{}", id),
            image: String::new(),
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&susu(1, 50_000), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().minor(), 100_000);
    }

    #[test]
    fn test_add_same_product_merges_lines() {
        let mut cart = Cart::new();
        let product = susu(1, 50_000);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_adjust_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&susu(1, 50_000), 1).unwrap();

        cart.adjust_quantity(1, -1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&susu(1, 50_000), 3).unwrap();

        cart.set_quantity(1, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_product_errors() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_quantity(42, 1),
            Err(CoreError::ProductNotInCart(42))
        ));
        assert!(matches!(
            cart.remove_item(42),
            Err(CoreError::ProductNotInCart(42))
        ));
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let product = susu(1, 50_000);
        cart.add_item(&product, MAX_ITEM_QUANTITY).unwrap();

        assert!(matches!(
            cart.add_item(&product, 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_line_cap() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add_item(&susu(id + 1, 1_000), 1).unwrap();
        }

        assert!(matches!(
            cart.add_item(&susu(9_999, 1_000), 1),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_price_frozen_in_line() {
        let mut cart = Cart::new();
        let mut product = susu(1, 50_000);
        cart.add_item(&product, 1).unwrap();

        product.price = Money::from_minor(60_000);
        assert_eq!(cart.subtotal().minor(), 50_000);
    }

    #[test]
    fn test_from_items_drops_invalid_quantities() {
        let valid = CartItem::from_product(&susu(1, 50_000), 2);
        let zero = CartItem {
            quantity: 0,
            ..CartItem::from_product(&susu(2, 10_000), 1)
        };
        let negative = CartItem {
            quantity: -3,
            ..CartItem::from_product(&susu(3, 10_000), 1)
        };
        let oversized = CartItem {
            quantity: MAX_ITEM_QUANTITY + 1,
            ..CartItem::from_product(&susu(4, 10_000), 1)
        };

        let cart = Cart::from_items(vec![valid, zero, negative, oversized]);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].product_id, 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&susu(1, 50_000), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }
}
