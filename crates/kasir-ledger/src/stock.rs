//! # Stock Ledger
//!
//! Append-only stock movement log plus the derived per-product stock
//! table, kept consistent with it.
//!
//! ## Compound Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  record_movement(product, direction, qty, reason)                   │
//! │                                                                     │
//! │  ── acquire per-ledger mutex ──────────────────────────────────     │
//! │                                                                     │
//! │  1. read movement log        (pos.stock-movements)                  │
//! │  2. prepend new movement, trim to 500                               │
//! │  3. WRITE movement log       ← log is durable first                 │
//! │  4. read stock table         (pos.product-stocks)                   │
//! │  5. current = max(0, current ± qty), create row if absent           │
//! │  6. WRITE stock table                                               │
//! │                                                                     │
//! │  ── release mutex ─────────────────────────────────────────────     │
//! │                                                                     │
//! │  Write order matters: a reader may see a movement whose stock       │
//! │  update hasn't landed yet (harmless - replaying the log repairs     │
//! │  it), but never a stock level without its movement.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The floor clamp applies at every step, not at the end: replaying the
//! retained log for a product from zero, clamping each step, reproduces
//! the stored `current_stock` exactly.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::store::{keys, KeyValueStore};
use kasir_core::types::{
    MovementDirection, ProductId, ProductStock, StockMovement, DEFAULT_MIN_STOCK,
};
use kasir_core::validation;

/// Movement log capacity: the newest 500 entries are retained.
pub const MOVEMENT_LOG_CAPACITY: usize = 500;

/// The stock ledger.
///
/// Cloning yields another handle to the same ledger: the store and the
/// serialization mutex are shared, so compound updates stay serialized
/// no matter how many handles exist.
#[derive(Debug, Clone)]
pub struct StockLedger<S> {
    store: Arc<S>,
    write_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> StockLedger<S> {
    /// Creates a stock ledger over the given store.
    pub fn new(store: Arc<S>) -> Self {
        StockLedger {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Records a stock movement and updates the product's stock level.
    ///
    /// ## Preconditions
    /// - `quantity > 0` (direction carries the sign)
    /// - `reason` non-empty
    ///
    /// ## Effect
    /// Appends the movement (newest first, log trimmed to
    /// [`MOVEMENT_LOG_CAPACITY`]), then updates or creates the
    /// [`ProductStock`] row: `current = max(0, current ± quantity)`,
    /// `last_updated = now`. Rows created here default `min_stock` to 5.
    pub async fn record_movement(
        &self,
        product_id: ProductId,
        product_name: &str,
        direction: MovementDirection,
        quantity: i64,
        reason: &str,
    ) -> LedgerResult<StockMovement> {
        validation::validate_product_id(product_id)?;
        validation::validate_quantity(quantity)?;
        validation::validate_reason(reason)?;

        let movement = StockMovement {
            id: format!("mov_{}", Uuid::new_v4().simple()),
            product_id,
            product_name: product_name.to_string(),
            direction,
            quantity,
            reason: reason.trim().to_string(),
            timestamp: Utc::now(),
        };

        let _guard = self.write_lock.lock().await;

        // Log first: the derived table must never lead the log.
        let mut log: Vec<StockMovement> =
            self.store.get_or_default(keys::STOCK_MOVEMENTS).await?;
        log.insert(0, movement.clone());
        log.truncate(MOVEMENT_LOG_CAPACITY);
        self.store.set(keys::STOCK_MOVEMENTS, &log).await?;

        self.apply_stock_delta(product_id, direction.signed(quantity))
            .await?;

        debug!(
            product_id,
            ?direction,
            quantity,
            reason = %movement.reason,
            "Recorded stock movement"
        );
        Ok(movement)
    }

    /// Sets the low-stock threshold for a product. Writes no movement.
    ///
    /// Creates the stock row with `current_stock = 0` if none exists;
    /// unlike movement-created rows, no default threshold applies since
    /// the caller is supplying one.
    pub async fn set_minimum_stock(
        &self,
        product_id: ProductId,
        min_stock: i64,
    ) -> LedgerResult<()> {
        validation::validate_product_id(product_id)?;
        validation::validate_min_stock(min_stock)?;

        let _guard = self.write_lock.lock().await;

        let mut stocks: Vec<ProductStock> =
            self.store.get_or_default(keys::PRODUCT_STOCKS).await?;
        let now = Utc::now();

        match stocks.iter_mut().find(|s| s.product_id == product_id) {
            Some(row) => {
                row.min_stock = min_stock;
                row.last_updated = now;
            }
            None => stocks.push(ProductStock {
                product_id,
                current_stock: 0,
                min_stock,
                last_updated: now,
            }),
        }

        self.store.set(keys::PRODUCT_STOCKS, &stocks).await?;
        debug!(product_id, min_stock, "Set minimum stock");
        Ok(())
    }

    /// Returns every stock row at or below its low-stock threshold.
    pub async fn get_low_stock_products(&self) -> LedgerResult<Vec<ProductStock>> {
        let stocks: Vec<ProductStock> = self.store.get_or_default(keys::PRODUCT_STOCKS).await?;
        Ok(stocks.into_iter().filter(|s| s.is_low_stock()).collect())
    }

    /// Current stock level for a product; 0 for products with no row.
    /// Never negative.
    pub async fn get_current_stock(&self, product_id: ProductId) -> LedgerResult<i64> {
        Ok(self
            .get_product_stock(product_id)
            .await?
            .map(|s| s.current_stock)
            .unwrap_or(0))
    }

    /// The stock row for a product, if any movement or threshold ever
    /// touched it.
    pub async fn get_product_stock(
        &self,
        product_id: ProductId,
    ) -> LedgerResult<Option<ProductStock>> {
        let stocks: Vec<ProductStock> = self.store.get_or_default(keys::PRODUCT_STOCKS).await?;
        Ok(stocks.into_iter().find(|s| s.product_id == product_id))
    }

    /// All stock rows.
    pub async fn get_product_stocks(&self) -> LedgerResult<Vec<ProductStock>> {
        Ok(self.store.get_or_default(keys::PRODUCT_STOCKS).await?)
    }

    /// The retained movement log, newest first.
    pub async fn get_movements(&self) -> LedgerResult<Vec<StockMovement>> {
        Ok(self.store.get_or_default(keys::STOCK_MOVEMENTS).await?)
    }

    /// Applies a signed delta to a product's stock row, clamping at zero.
    /// Caller must hold `write_lock`.
    async fn apply_stock_delta(&self, product_id: ProductId, delta: i64) -> LedgerResult<()> {
        let mut stocks: Vec<ProductStock> =
            self.store.get_or_default(keys::PRODUCT_STOCKS).await?;
        let now = Utc::now();

        match stocks.iter_mut().find(|s| s.product_id == product_id) {
            Some(row) => {
                row.current_stock = (row.current_stock + delta).max(0);
                row.last_updated = now;
            }
            None => stocks.push(ProductStock {
                product_id,
                current_stock: delta.max(0),
                min_stock: DEFAULT_MIN_STOCK,
                last_updated: now,
            }),
        }

        self.store.set(keys::PRODUCT_STOCKS, &stocks).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
