//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────┐        │
//! │  │   Product     │   │   Receipt     │   │ StockMovement  │        │
//! │  │  ───────────  │   │  ───────────  │   │  ────────────  │        │
//! │  │  id           │   │  items        │   │  product_id    │        │
//! │  │  name         │   │  subtotal/tax │   │  direction     │        │
//! │  │  price        │   │  cash/change  │   │  quantity      │        │
//! │  │  barcode      │   │  txn id       │   │  reason        │        │
//! │  └───────────────┘   └───────────────┘   └────────────────┘        │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐                             │
//! │  │ ProductStock  │   │ DailyAggregate│   derived tables, kept      │
//! │  │ current/min   │   │ per-day totals│   consistent with the logs  │
//! │  └───────────────┘   └───────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `Receipt` and a `StockMovement` carry denormalized copies of product
//! fields (name, price). Once written they never chase the live catalog,
//! so printing or export needs no further lookups and product edits never
//! rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::CartItem;
use crate::money::Money;

/// Product identifier: unique positive integer assigned by the catalog.
pub type ProductId = i64;

// =============================================================================
// Product & Category
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (positive integer).
    pub id: ProductId,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price in whole rupiah.
    pub price: Money,

    /// Category from the store's fixed set.
    #[serde(default)]
    pub category: Category,

    /// Barcode (EAN-13 etc.). Should be unique; not enforced.
    pub barcode: String,

    /// Image reference (path or URL); display concern only.
    pub image: String,
}

/// Product category.
///
/// The set is fixed for this store; anything unmapped lands in
/// `Uncategorized` rather than failing deserialization of old data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Formula milk.
    Susu,
    /// Diapers.
    Pampers,
    /// Baby cosmetics.
    Kosmetik,
    /// General supplies.
    Perlengkapan,
    /// Baby food.
    Makanan,
    /// Fallback for products without a known category.
    #[default]
    #[serde(other)]
    Uncategorized,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Susu => "Susu Formula",
            Category::Pampers => "Pampers",
            Category::Kosmetik => "Kosmetik Bayi",
            Category::Perlengkapan => "Perlengkapan",
            Category::Makanan => "Makanan Bayi",
            Category::Uncategorized => "Uncategorized",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; change may be due.
    Cash,
    /// QRIS scan-to-pay; tendered amount always equals the total.
    Qris,
}

// =============================================================================
// Receipt
// =============================================================================

/// An immutable record of a completed sale.
///
/// ## Invariants (enforced by the checkout builders in [`crate::checkout`])
/// - `tax = round(subtotal × rate)`
/// - `total = subtotal + tax`
/// - `change = cash - total`, never negative
/// - QRIS payments have `cash == total` and `change == 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Ordered cart snapshot at time of sale.
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    /// Cash tendered by the customer.
    pub cash: Money,
    /// Change returned to the customer.
    pub change: Money,
    pub method: PaymentMethod,
    pub timestamp: DateTime<Utc>,
    /// Customer-facing 6-digit transaction number.
    pub transaction_id: u32,
}

impl Receipt {
    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Stock received (restock, correction upward).
    In,
    /// Stock leaving (sale, damage, correction downward).
    Out,
}

impl MovementDirection {
    /// Signed quantity delta this direction applies to the stock level.
    pub const fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementDirection::In => quantity,
            MovementDirection::Out => -quantity,
        }
    }
}

/// A single append-only stock event. Never mutated; only capacity
/// trimming of the oldest entries removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Generated unique id.
    pub id: String,
    pub product_id: ProductId,
    /// Product name at time of movement (frozen).
    pub product_name: String,
    pub direction: MovementDirection,
    /// Always positive; `direction` carries the sign.
    pub quantity: i64,
    /// Free-text reason ("restock", "Sale - Transaction #123", ...).
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Product Stock
// =============================================================================

/// Per-product stock level, derived incrementally from the movement log.
///
/// `current_stock` is the floor-clamped running sum of in minus out
/// movements; replaying the log for a product (clamping at each step)
/// must reproduce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStock {
    pub product_id: ProductId,
    /// Floor-clamped at zero; never negative.
    pub current_stock: i64,
    /// Low-stock threshold; defaults to 5 when created by a movement.
    pub min_stock: i64,
    pub last_updated: DateTime<Utc>,
}

impl ProductStock {
    /// A product is low on stock when `current_stock <= min_stock`.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

/// Default low-stock threshold for rows created implicitly by a movement.
pub const DEFAULT_MIN_STOCK: i64 = 5;

// =============================================================================
// Daily Aggregate
// =============================================================================

/// Running totals for one store-local calendar date.
///
/// Exactly one row exists per date with at least one transaction; every
/// later transaction that day updates the same row in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// Store-local calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub total_sales: Money,
    pub total_transactions: i64,
    pub total_items: i64,
}

impl DailyAggregate {
    /// Fresh aggregate seeded from the first receipt of the day.
    pub fn opening(date: String, receipt: &Receipt) -> Self {
        DailyAggregate {
            date,
            total_sales: receipt.total,
            total_transactions: 1,
            total_items: receipt.total_quantity(),
        }
    }

    /// Folds one more receipt into the day's totals.
    pub fn absorb(&mut self, receipt: &Receipt) {
        self.total_sales += receipt.total;
        self.total_transactions += 1;
        self.total_items += receipt.total_quantity();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Susu.to_string(), "Susu Formula");
        assert_eq!(Category::Uncategorized.to_string(), "Uncategorized");
    }

    #[test]
    fn test_category_default_is_uncategorized() {
        assert_eq!(Category::default(), Category::Uncategorized);
    }

    #[test]
    fn test_movement_direction_signed() {
        assert_eq!(MovementDirection::In.signed(3), 3);
        assert_eq!(MovementDirection::Out.signed(3), -3);
    }

    #[test]
    fn test_low_stock_boundary() {
        let stock = ProductStock {
            product_id: 1,
            current_stock: 5,
            min_stock: 5,
            last_updated: Utc::now(),
        };
        // current == min counts as low
        assert!(stock.is_low_stock());

        let ok = ProductStock {
            current_stock: 6,
            ..stock.clone()
        };
        assert!(!ok.is_low_stock());
    }
}
