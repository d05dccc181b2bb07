//! # Ledger Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  StoreError (persistence boundary)                                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  LedgerError ← adds validation failures on ledger preconditions     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CheckoutError ← merges with CoreError for the engine surface       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Caller decides: retry, surface to cashier, or abort                │
//! │                                                                     │
//! │  Nothing is swallowed. The original POS logged storage failures     │
//! │  and carried on as if the write happened; here a failed write is    │
//! │  a failed operation.                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::store::StoreError;
use kasir_core::{CoreError, ValidationError};

// =============================================================================
// Ledger Error
// =============================================================================

/// Failures from stock/sales ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The persistence boundary failed; prior state is unchanged.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A ledger precondition failed (non-positive quantity, negative
    /// minimum stock, empty reason).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Failures from the checkout engine: either the pure validation half
/// (empty cart, insufficient cash) or the ledger write half.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout validation failed; no ledger was touched.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The ledger write failed after validation passed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for checkout engine operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================
