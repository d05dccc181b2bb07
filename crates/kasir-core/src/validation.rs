//! # Validation Module
//!
//! Input validation for catalog management and ledger preconditions.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Presentation (forms, scanner input)                       │
//! │  ├── Basic format checks, immediate feedback                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │  ├── Runs again inside catalog CRUD and ledger operations so the    │
//! │  │   core never trusts its callers                                  │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Checkout guards (empty cart, insufficient cash)           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductId;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - May be empty (not every product carries one)
/// - At most 32 characters
/// - Digits only (EAN-13, UPC-A and friends are numeric)
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "barcode",
            max: 32,
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode",
            reason: "must contain only digits",
        });
    }

    Ok(())
}

/// Validates a stock movement reason.
///
/// ## Rules
/// - Must not be empty; every movement is audited with a cause
/// - At most 200 characters
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required { field: "reason" });
    }

    if reason.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "reason",
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product id (positive integer).
pub fn validate_product_id(id: ProductId) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "product id",
        });
    }

    Ok(())
}

/// Validates a quantity: strictly positive, capped at the per-line max.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price: zero is allowed (free items), negative is not.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative { field: "price" });
    }

    Ok(())
}

/// Validates a minimum-stock threshold: zero or greater.
pub fn validate_min_stock(min_stock: i64) -> ValidationResult<()> {
    if min_stock < 0 {
        return Err(ValidationError::MustNotBeNegative { field: "min_stock" });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Susu Formula A 400g").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("8990000000001").is_ok());
        assert!(validate_barcode("").is_ok()); // optional
        assert!(validate_barcode("ABC123").is_err());
        assert!(validate_barcode(&"1".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_reason() {
        assert!(validate_reason("restock").is_ok());
        assert!(validate_reason("").is_err());
        assert!(validate_reason(&"x".repeat(250)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_minor(50_000)).is_ok());
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_min_stock() {
        assert!(validate_min_stock(0).is_ok());
        assert!(validate_min_stock(10).is_ok());
        assert!(validate_min_stock(-1).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id(1).is_ok());
        assert!(validate_product_id(0).is_err());
        assert!(validate_product_id(-5).is_err());
    }
}
