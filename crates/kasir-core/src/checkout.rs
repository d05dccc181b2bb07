//! # Checkout
//!
//! The pure half of the checkout engine: totals arithmetic, receipt
//! construction with its validation guards, and the per-attempt state
//! machine. Ledger orchestration lives in kasir-ledger; nothing here
//! touches storage.
//!
//! ## Checkout Math
//! ```text
//! subtotal = Σ price × quantity       (over cart lines, order-independent)
//! tax      = round(subtotal × rate)   (integer add-half rounding)
//! total    = subtotal + tax
//! change   = cash - total             (cash path; rejected if negative)
//! ```
//!
//! QRIS receipts set `cash = total` and `change = 0`; the scan-to-pay
//! confirmation is an external stub, not a core concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::types::{PaymentMethod, Receipt};

// =============================================================================
// Totals
// =============================================================================

/// Computed totals for a cart at a given tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Computes subtotal, tax, and total for a cart.
///
/// Deterministic and order-independent: the subtotal is a plain sum of
/// line totals, and tax is applied once to the subtotal (not per line).
pub fn compute_totals(cart: &Cart, rate: TaxRate) -> CheckoutTotals {
    let subtotal = cart.subtotal();
    let tax = subtotal.calculate_tax(rate);
    CheckoutTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Receipt Builders
// =============================================================================

/// Builds the receipt for a cash payment.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] if the cart has no lines
/// - [`CoreError::InsufficientCash`] if `cash < total`
///
/// Both reject before any receipt exists, so a stored receipt can never
/// carry negative change.
pub fn build_cash_receipt(
    cart: &Cart,
    rate: TaxRate,
    cash: Money,
    transaction_id: u32,
    timestamp: DateTime<Utc>,
) -> CoreResult<Receipt> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let totals = compute_totals(cart, rate);
    if cash < totals.total {
        return Err(CoreError::InsufficientCash {
            tendered: cash,
            total: totals.total,
        });
    }

    Ok(Receipt {
        items: cart.items().to_vec(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        cash,
        change: cash - totals.total,
        method: PaymentMethod::Cash,
        timestamp,
        transaction_id,
    })
}

/// Builds the receipt for a QRIS payment.
///
/// The tendered amount equals the total by definition, so only the
/// empty-cart guard applies.
pub fn build_qris_receipt(
    cart: &Cart,
    rate: TaxRate,
    transaction_id: u32,
    timestamp: DateTime<Utc>,
) -> CoreResult<Receipt> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let totals = compute_totals(cart, rate);
    Ok(Receipt {
        items: cart.items().to_vec(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        cash: totals.total,
        change: Money::zero(),
        method: PaymentMethod::Qris,
        timestamp,
        transaction_id,
    })
}

// =============================================================================
// Checkout Attempt State Machine
// =============================================================================

/// State of a single checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    /// No attempt in progress.
    #[default]
    Idle,
    /// Totals shown, waiting for tender (cash count or QRIS scan).
    AwaitingPayment,
    /// Totals validated and the ledger write succeeded.
    Completed,
    /// Validation or ledger write failed; cart untouched, retry allowed.
    Failed,
    /// Cashier backed out; cart untouched.
    Cancelled,
}

/// A single checkout attempt.
///
/// ```text
/// Idle ──begin──► AwaitingPayment ──complete──► Completed
///                       │     └──────fail─────► Failed
///                       └──────────cancel─────► Cancelled
/// ```
///
/// `Completed` is reached only after both totals validation and the
/// ledger write succeed. `Failed` and `Cancelled` are terminal for the
/// attempt but leave the cart ready for retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckoutAttempt {
    state: CheckoutState,
}

impl CheckoutAttempt {
    /// Starts a new attempt in `Idle`.
    pub fn new() -> Self {
        CheckoutAttempt {
            state: CheckoutState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// `Idle → AwaitingPayment`.
    pub fn begin(&mut self) -> CoreResult<()> {
        self.transition(CheckoutState::Idle, CheckoutState::AwaitingPayment)
    }

    /// `AwaitingPayment → Completed`.
    pub fn complete(&mut self) -> CoreResult<()> {
        self.transition(CheckoutState::AwaitingPayment, CheckoutState::Completed)
    }

    /// `AwaitingPayment → Failed`.
    ///
    /// Infallible: a validation or persist failure must always be
    /// recordable, wherever the attempt stands when it happens. The one
    /// exception is `Completed`, which is never demoted.
    pub fn fail(&mut self) {
        if self.state != CheckoutState::Completed {
            self.state = CheckoutState::Failed;
        }
    }

    /// `AwaitingPayment → Cancelled`.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.transition(CheckoutState::AwaitingPayment, CheckoutState::Cancelled)
    }

    fn transition(&mut self, expected: CheckoutState, to: CheckoutState) -> CoreResult<()> {
        if self.state != expected {
            return Err(CoreError::InvalidCheckoutTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Product};

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: Money::from_minor(price),
            category: Category::Susu,
            barcode: String::new(),
            image: String::new(),
        }
    }

    fn ppn() -> TaxRate {
        TaxRate::from_bps(1100)
    }

    /// The worked example: Susu A Rp50.000 × 2, cash Rp120.000.
    #[test]
    fn test_cash_receipt_worked_example() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Susu A", 50_000), 2).unwrap();

        let receipt =
            build_cash_receipt(&cart, ppn(), Money::from_minor(120_000), 123_456, Utc::now())
                .unwrap();

        assert_eq!(receipt.subtotal.minor(), 100_000);
        assert_eq!(receipt.tax.minor(), 11_000);
        assert_eq!(receipt.total.minor(), 111_000);
        assert_eq!(receipt.change.minor(), 9_000);
        assert_eq!(receipt.method, PaymentMethod::Cash);
        assert_eq!(receipt.transaction_id, 123_456);
        assert_eq!(receipt.total_quantity(), 2);
    }

    #[test]
    fn test_totals_order_independent() {
        let a = product(1, "A", 17_000);
        let b = product(2, "B", 23_500);
        let c = product(3, "C", 9_900);

        let mut cart_abc = Cart::new();
        cart_abc.add_item(&a, 2).unwrap();
        cart_abc.add_item(&b, 1).unwrap();
        cart_abc.add_item(&c, 3).unwrap();

        let mut cart_cba = Cart::new();
        cart_cba.add_item(&c, 3).unwrap();
        cart_cba.add_item(&b, 1).unwrap();
        cart_cba.add_item(&a, 2).unwrap();

        assert_eq!(
            compute_totals(&cart_abc, ppn()),
            compute_totals(&cart_cba, ppn())
        );
    }

    #[test]
    fn test_total_matches_rate_formula() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "A", 50_000), 2).unwrap();

        let totals = compute_totals(&cart, ppn());
        // total = subtotal × (1 + r), expressed in integer arithmetic
        assert_eq!(totals.total, totals.subtotal + totals.tax);
        assert_eq!(totals.tax, totals.subtotal.calculate_tax(ppn()));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let cart = Cart::new();

        let err = build_cash_receipt(&cart, ppn(), Money::from_minor(100_000), 1, Utc::now())
            .unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);

        let err = build_qris_receipt(&cart, ppn(), 1, Utc::now()).unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);
    }

    #[test]
    fn test_insufficient_cash_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "A", 50_000), 2).unwrap();

        // Total is Rp111.000; tendering the bare subtotal is not enough
        let err = build_cash_receipt(&cart, ppn(), Money::from_minor(100_000), 1, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientCash {
                tendered: Money::from_minor(100_000),
                total: Money::from_minor(111_000),
            }
        );
    }

    #[test]
    fn test_exact_cash_gives_zero_change() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "A", 50_000), 2).unwrap();

        let receipt =
            build_cash_receipt(&cart, ppn(), Money::from_minor(111_000), 1, Utc::now()).unwrap();
        assert!(receipt.change.is_zero());
    }

    #[test]
    fn test_qris_receipt_tenders_exact_total() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "A", 50_000), 2).unwrap();

        let receipt = build_qris_receipt(&cart, ppn(), 654_321, Utc::now()).unwrap();
        assert_eq!(receipt.method, PaymentMethod::Qris);
        assert_eq!(receipt.cash, receipt.total);
        assert!(receipt.change.is_zero());
    }

    #[test]
    fn test_receipt_snapshots_cart_lines() {
        let mut cart = Cart::new();
        cart.add_item(&product(7, "Susu A", 50_000), 2).unwrap();

        let receipt = build_qris_receipt(&cart, ppn(), 1, Utc::now()).unwrap();
        cart.clear();

        // The receipt keeps its own copy of the lines
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].product_id, 7);
        assert_eq!(receipt.items[0].quantity, 2);
    }

    #[test]
    fn test_attempt_happy_path() {
        let mut attempt = CheckoutAttempt::new();
        assert_eq!(attempt.state(), CheckoutState::Idle);

        attempt.begin().unwrap();
        assert_eq!(attempt.state(), CheckoutState::AwaitingPayment);

        attempt.complete().unwrap();
        assert_eq!(attempt.state(), CheckoutState::Completed);
    }

    #[test]
    fn test_attempt_fail_and_cancel_paths() {
        let mut attempt = CheckoutAttempt::new();
        attempt.begin().unwrap();
        attempt.fail();
        assert_eq!(attempt.state(), CheckoutState::Failed);

        let mut attempt = CheckoutAttempt::new();
        attempt.begin().unwrap();
        attempt.cancel().unwrap();
        assert_eq!(attempt.state(), CheckoutState::Cancelled);
    }

    #[test]
    fn test_attempt_rejects_invalid_transitions() {
        // Completing from Idle
        let mut attempt = CheckoutAttempt::new();
        assert!(matches!(
            attempt.complete(),
            Err(CoreError::InvalidCheckoutTransition { .. })
        ));

        // Re-beginning a completed attempt
        let mut attempt = CheckoutAttempt::new();
        attempt.begin().unwrap();
        attempt.complete().unwrap();
        assert!(matches!(
            attempt.begin(),
            Err(CoreError::InvalidCheckoutTransition { .. })
        ));
    }

    #[test]
    fn test_fail_never_demotes_a_completed_attempt() {
        let mut attempt = CheckoutAttempt::new();
        attempt.begin().unwrap();
        attempt.complete().unwrap();

        attempt.fail();
        assert_eq!(attempt.state(), CheckoutState::Completed);
    }
}
