//! # Kasir Ledger
//!
//! Persistence and orchestration for the Kasir POS terminal: the
//! key/value store abstraction, the stock and sales ledgers built on
//! it, active-cart persistence, and the checkout engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         kasir-ledger                                │
//! │                                                                     │
//! │   CheckoutEngine ──► SalesLedger ──► StockLedger                    │
//! │        │                  │               │                         │
//! │        │   CartStore      │               │                         │
//! │        │        │         │               │                         │
//! │        ▼        ▼         ▼               ▼                         │
//! │   ┌───────────────────────────────────────────────┐                 │
//! │   │        KeyValueStore (trait)                  │                 │
//! │   │   SqliteStore (durable) / MemoryStore (test)  │                 │
//! │   └───────────────────────────────────────────────┘                 │
//! │                                                                     │
//! │   All domain math and validation come from kasir-core; this crate   │
//! │   only decides when to read, lock, and write.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Layout
//! Each ledger owns one JSON document per key (`pos.*`), newest entry
//! first, with a fixed retention cap. See [`store::keys`].

pub mod cart;
pub mod engine;
pub mod error;
pub mod sales;
pub mod stock;
pub mod store;

pub use cart::CartStore;
pub use engine::{generate_transaction_id, CheckoutEngine};
pub use error::{CheckoutError, CheckoutResult, LedgerError, LedgerResult};
pub use sales::{
    SalesLedger, SalesStatistics, TransactionRecord, DAILY_AGGREGATE_CAPACITY,
    TRANSACTION_HISTORY_CAPACITY,
};
pub use stock::{StockLedger, MOVEMENT_LOG_CAPACITY};
pub use store::{
    KeyValueStore, MemoryStore, SqliteStore, StoreConfig, StoreError, StoreResult,
};
