//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  kasir-core errors (this file)                                      │
//! │  ├── CoreError        - Checkout and cart rule violations           │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  kasir-ledger errors (separate crate)                               │
//! │  ├── StoreError       - Persistence failures                        │
//! │  ├── LedgerError      - Ledger operation failures                   │
//! │  └── CheckoutError    - Engine: core + ledger combined              │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → CheckoutError → caller/UI      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derives, never manual impls
//! 2. Context in the error payload (amounts, ids), never bare strings
//! 3. Checkout-validation errors surface synchronously so the UI can
//!    prompt correction; nothing here is swallowed

use thiserror::Error;

use crate::checkout::CheckoutState;
use crate::money::Money;
use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations in cart and checkout logic.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Checkout attempted with no cart lines.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Tendered cash is below the receipt total.
    ///
    /// Rejecting this up front is what guarantees a stored receipt can
    /// never carry negative change.
    #[error("insufficient cash: tendered {tendered}, total {total}")]
    InsufficientCash { tendered: Money, total: Money },

    /// Cart has reached the maximum number of distinct lines.
    #[error("cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity would exceed the per-line maximum.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart operation referenced a product with no line in the cart.
    #[error("product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    /// Catalog operation referenced an unknown product.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Illegal checkout state transition (e.g. completing an attempt
    /// that never reached payment).
    #[error("checkout attempt is {from:?}, cannot transition to {to:?}")]
    InvalidCheckoutTransition {
        from: CheckoutState,
        to: CheckoutState,
    },

    /// Input validation failure (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: &'static str },

    /// Invalid format (e.g. non-digit barcode characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientCash {
            tendered: Money::from_minor(100_000),
            total: Money::from_minor(111_000),
        };
        assert_eq!(
            err.to_string(),
            "insufficient cash: tendered Rp100.000, total Rp111.000"
        );

        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "cannot check out an empty cart"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "name" };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive { field: "quantity" };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "name" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
