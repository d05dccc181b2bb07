//! # Sales Ledger
//!
//! Append-only transaction history plus the per-day aggregate table,
//! and the statistics derived from them.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  record_transaction(receipt)                                        │
//! │                                                                     │
//! │  ── acquire per-ledger mutex ──────────────────────────────────     │
//! │  1. wrap receipt in TransactionRecord (generated history id)        │
//! │  2. prepend to history, trim to 100     (pos.transactions)          │
//! │  3. fold into the day's aggregate row, trim to 30 days              │
//! │     (pos.daily-aggregates)                                          │
//! │  ── release mutex ─────────────────────────────────────────────     │
//! │                                                                     │
//! │  4. one stock-out movement per line, via the Stock Ledger           │
//! │     reason: "Sale - Transaction #<id>"                              │
//! │                                                                     │
//! │  Step 4 failures do NOT roll back steps 2-3: the sales record is    │
//! │  authoritative, incomplete stock bookkeeping is logged at warn      │
//! │  level and repaired by a manual adjustment. This is a documented    │
//! │  limitation, inherited from the original and kept deliberately.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::LedgerResult;
use crate::stock::StockLedger;
use crate::store::{keys, KeyValueStore};
use kasir_core::money::Money;
use kasir_core::types::{DailyAggregate, MovementDirection, Receipt};

/// Transaction history capacity: the newest 100 records are retained.
pub const TRANSACTION_HISTORY_CAPACITY: usize = 100;

/// Daily aggregate capacity: the newest 30 days are retained.
pub const DAILY_AGGREGATE_CAPACITY: usize = 30;

// =============================================================================
// Records
// =============================================================================

/// A receipt as stored in the transaction history, wrapped with the
/// ledger's own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// History id: `txn_<transaction_id>_<millis>`.
    pub id: String,
    #[serde(flatten)]
    pub receipt: Receipt,
}

/// Derived sales statistics for the reporting screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesStatistics {
    /// Sums across every retained aggregate row.
    pub total_sales: Money,
    pub total_transactions: i64,
    pub total_items: i64,

    /// Today's row, zeroed when no sale has happened yet today.
    pub today_sales: Money,
    pub today_transactions: i64,
    pub today_items: i64,

    /// `total_sales / total_transactions`; zero when there are none.
    pub average_transaction: Money,

    /// The most recent 7 aggregate rows, newest first.
    pub recent_days: Vec<DailyAggregate>,
}

/// Store-local calendar date (`YYYY-MM-DD`) for a UTC timestamp.
///
/// Aggregates bucket by the store's wall clock, not UTC: a sale at 23:30
/// local time belongs to that local day even if UTC has rolled over.
pub fn local_day(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

// =============================================================================
// Sales Ledger
// =============================================================================

/// The sales ledger. Owns a [`StockLedger`] handle so a recorded sale
/// can decrement stock per line.
#[derive(Debug, Clone)]
pub struct SalesLedger<S> {
    store: Arc<S>,
    stock: StockLedger<S>,
    write_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> SalesLedger<S> {
    /// Creates a sales ledger over the given store and stock ledger.
    pub fn new(store: Arc<S>, stock: StockLedger<S>) -> Self {
        SalesLedger {
            store,
            stock,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The stock ledger this sales ledger decrements through.
    pub fn stock(&self) -> &StockLedger<S> {
        &self.stock
    }

    /// Records a completed sale.
    ///
    /// ## Precondition
    /// The receipt has at least one line. The checkout engine enforces
    /// this before a receipt can exist; this method does not re-check.
    ///
    /// ## Effect
    /// Prepends the wrapped receipt to the history (trimmed to
    /// [`TRANSACTION_HISTORY_CAPACITY`]), folds it into today's
    /// [`DailyAggregate`] (table trimmed to [`DAILY_AGGREGATE_CAPACITY`]),
    /// then emits one `out` movement per line. Per-line movement failures
    /// are logged and do not undo the sale.
    pub async fn record_transaction(&self, receipt: &Receipt) -> LedgerResult<TransactionRecord> {
        debug_assert!(!receipt.items.is_empty(), "engine must reject empty carts");

        let record = TransactionRecord {
            id: format!(
                "txn_{}_{}",
                receipt.transaction_id,
                Utc::now().timestamp_millis()
            ),
            receipt: receipt.clone(),
        };

        {
            let _guard = self.write_lock.lock().await;

            // History first: aggregates derive from it.
            let mut history: Vec<TransactionRecord> =
                self.store.get_or_default(keys::TRANSACTIONS).await?;
            history.insert(0, record.clone());
            history.truncate(TRANSACTION_HISTORY_CAPACITY);
            self.store.set(keys::TRANSACTIONS, &history).await?;

            let mut days: Vec<DailyAggregate> =
                self.store.get_or_default(keys::DAILY_AGGREGATES).await?;
            let day = local_day(receipt.timestamp);
            match days.iter_mut().find(|d| d.date == day) {
                Some(row) => row.absorb(receipt),
                None => days.insert(0, DailyAggregate::opening(day, receipt)),
            }
            days.truncate(DAILY_AGGREGATE_CAPACITY);
            self.store.set(keys::DAILY_AGGREGATES, &days).await?;
        }

        // Stock decrements are per line and not atomic as a group; the
        // sale above stays authoritative if any of them fail.
        let reason = format!("Sale - Transaction #{}", receipt.transaction_id);
        for item in &receipt.items {
            if let Err(err) = self
                .stock
                .record_movement(
                    item.product_id,
                    &item.name,
                    MovementDirection::Out,
                    item.quantity,
                    &reason,
                )
                .await
            {
                warn!(
                    product_id = item.product_id,
                    quantity = item.quantity,
                    %err,
                    "Stock decrement failed for sold line; stock table is behind the sale"
                );
            }
        }

        debug!(
            id = %record.id,
            total = %receipt.total,
            lines = receipt.items.len(),
            "Recorded transaction"
        );
        Ok(record)
    }

    /// The retained transaction history, newest first.
    pub async fn get_transaction_history(&self) -> LedgerResult<Vec<TransactionRecord>> {
        Ok(self.store.get_or_default(keys::TRANSACTIONS).await?)
    }

    /// The retained daily aggregates, newest first.
    pub async fn get_daily_aggregates(&self) -> LedgerResult<Vec<DailyAggregate>> {
        Ok(self.store.get_or_default(keys::DAILY_AGGREGATES).await?)
    }

    /// Derives the statistics summary from the aggregate table.
    pub async fn get_sales_statistics(&self) -> LedgerResult<SalesStatistics> {
        let days: Vec<DailyAggregate> = self.store.get_or_default(keys::DAILY_AGGREGATES).await?;

        let total_sales: Money = days.iter().map(|d| d.total_sales).sum();
        let total_transactions: i64 = days.iter().map(|d| d.total_transactions).sum();
        let total_items: i64 = days.iter().map(|d| d.total_items).sum();

        let today = local_day(Utc::now());
        let (today_sales, today_transactions, today_items) = days
            .iter()
            .find(|d| d.date == today)
            .map(|d| (d.total_sales, d.total_transactions, d.total_items))
            .unwrap_or((Money::zero(), 0, 0));

        // Divide-by-zero guard: an empty ledger averages to zero
        let average_transaction = if total_transactions > 0 {
            Money::from_minor(total_sales.minor() / total_transactions)
        } else {
            Money::zero()
        };

        Ok(SalesStatistics {
            total_sales,
            total_transactions,
            total_items,
            today_sales,
            today_transactions,
            today_items,
            average_transaction,
            recent_days: days.into_iter().take(7).collect(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
