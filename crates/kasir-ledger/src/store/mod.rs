//! # Persistent Store
//!
//! The key/value persistence boundary every ledger writes through.
//!
//! ## Store Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     KeyValueStore Contract                          │
//! │                                                                     │
//! │  get_raw(key)  → Ok(Some(json)) | Ok(None)    missing key is fine   │
//! │  set_raw(k, v) → Ok(())                       overwrite semantics   │
//! │  remove(key)   → Ok(())                       idempotent            │
//! │                                                                     │
//! │  Typed helpers on top:                                              │
//! │  get_or_default::<T>() - missing key → T::default()                 │
//! │                          malformed JSON → warn! + T::default()      │
//! │  set::<T>()            - serde_json round-trip                      │
//! │                                                                     │
//! │  Backend failures always PROPAGATE as StoreError. The original      │
//! │  swallowed them; the ledger caller decides retry/surface policy.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The malformed-JSON fallback is deliberate: a half-migrated or
//! hand-edited value must not brick the terminal, so reads degrade to an
//! empty collection with a logged diagnostic. Write failures are real
//! errors and never degrade silently.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};

// =============================================================================
// Storage Keys
// =============================================================================

/// The fixed key set. One key per persisted collection; shapes are
/// documented on the types they hold.
pub mod keys {
    /// Transaction history: `Vec<TransactionRecord>`, newest first, ≤ 100.
    pub const TRANSACTIONS: &str = "pos.transactions";

    /// Daily aggregates: `Vec<DailyAggregate>`, newest first, ≤ 30.
    pub const DAILY_AGGREGATES: &str = "pos.daily-aggregates";

    /// Active cart snapshot: `Vec<CartItem>`.
    pub const ACTIVE_CART: &str = "pos.active-cart";

    /// Stock movement log: `Vec<StockMovement>`, newest first, ≤ 500.
    pub const STOCK_MOVEMENTS: &str = "pos.stock-movements";

    /// Product stock table: `Vec<ProductStock>`, one row per product.
    pub const PRODUCT_STOCKS: &str = "pos.product-stocks";
}

// =============================================================================
// Store Error
// =============================================================================

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value could not be serialized for writing.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend rejected or failed the operation (I/O, pool, SQL).
    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a backend error from any displayable cause.
    pub fn backend(cause: impl std::fmt::Display) -> Self {
        StoreError::Backend(cause.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Key/Value Store Trait
// =============================================================================

/// Durable key/value storage over JSON-serializable values.
///
/// Implementations: [`SqliteStore`] for production, [`MemoryStore`] for
/// tests. Ledgers are generic over this trait and never reach a global
/// singleton.
pub trait KeyValueStore {
    /// Reads the raw JSON value under `key`; `None` if absent.
    fn get_raw(&self, key: &str) -> impl std::future::Future<Output = StoreResult<Option<Value>>>;

    /// Writes `value` under `key`, replacing any existing value.
    fn set_raw(&self, key: &str, value: Value) -> impl std::future::Future<Output = StoreResult<()>>;

    /// Removes `key` if present.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = StoreResult<()>>;

    /// Typed read with the contract's tolerance rules: missing key and
    /// malformed JSON both yield `T::default()` (the latter with a
    /// logged warning).
    fn get_or_default<T>(&self, key: &str) -> impl std::future::Future<Output = StoreResult<T>>
    where
        T: DeserializeOwned + Default,
        Self: Sized,
    {
        async move {
            let Some(raw) = self.get_raw(key).await? else {
                return Ok(T::default());
            };
            match serde_json::from_value(raw) {
                Ok(value) => Ok(value),
                Err(err) => {
                    warn!(key, %err, "Stored value is malformed; falling back to default");
                    Ok(T::default())
                }
            }
        }
    }

    /// Typed write.
    fn set<T>(&self, key: &str, value: &T) -> impl std::future::Future<Output = StoreResult<()>>
    where
        T: Serialize + ?Sized,
        Self: Sized,
    {
        async move {
            let raw = serde_json::to_value(value)?;
            self.set_raw(key, raw).await
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;

    use serde_json::Value;

    use super::{KeyValueStore, MemoryStore, StoreError, StoreResult};

    /// [`MemoryStore`] wrapper that rejects writes to selected keys,
    /// standing in for a backend with a failing disk. Reads and removals
    /// pass through.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct FailingStore {
        inner: MemoryStore,
        broken_keys: HashSet<String>,
    }

    impl FailingStore {
        /// Fails every write to the listed keys.
        pub(crate) fn failing_writes_to(keys: &[&str]) -> Self {
            FailingStore {
                inner: MemoryStore::new(),
                broken_keys: keys.iter().map(|k| k.to_string()).collect(),
            }
        }
    }

    impl KeyValueStore for FailingStore {
        async fn get_raw(&self, key: &str) -> StoreResult<Option<Value>> {
            self.inner.get_raw(key).await
        }

        async fn set_raw(&self, key: &str, value: Value) -> StoreResult<()> {
            if self.broken_keys.contains(key) {
                return Err(StoreError::backend(format!("write refused: {key}")));
            }
            self.inner.set_raw(key, value).await
        }

        async fn remove(&self, key: &str) -> StoreResult<()> {
            self.inner.remove(key).await
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
