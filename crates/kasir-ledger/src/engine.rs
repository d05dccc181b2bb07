//! # Checkout Engine
//!
//! Orchestrates a checkout: validates the cart against the tendered
//! payment (kasir-core), then records the sale (sales ledger) and the
//! per-line stock decrements (stock ledger).
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  checkout_cash(cart, cash) / checkout_qris(cart)                    │
//! │                                                                     │
//! │  1. attempt.begin()          Idle → AwaitingPayment                 │
//! │  2. build receipt            EmptyCart / InsufficientCash reject    │
//! │       └─ on error: attempt.fail(), nothing persisted                │
//! │  3. record_transaction       history + aggregates + stock outs      │
//! │       └─ on error: attempt.fail(), receipt discarded                │
//! │  4. attempt.complete()       caller clears the cart                 │
//! │                                                                     │
//! │  A failed checkout leaves every ledger untouched; the cart stays    │
//! │  as rung up and the cashier retries.                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::error::CheckoutResult;
use crate::sales::SalesLedger;
use crate::store::KeyValueStore;
use kasir_core::cart::Cart;
use kasir_core::checkout::{
    build_cash_receipt, build_qris_receipt, compute_totals, CheckoutAttempt, CheckoutTotals,
};
use kasir_core::money::{Money, TaxRate};
use kasir_core::types::Receipt;

/// The checkout engine for one terminal.
#[derive(Debug, Clone)]
pub struct CheckoutEngine<S> {
    sales: SalesLedger<S>,
    tax_rate: TaxRate,
}

impl<S: KeyValueStore> CheckoutEngine<S> {
    /// Creates an engine at the default 11% PPN rate.
    pub fn new(sales: SalesLedger<S>) -> Self {
        CheckoutEngine {
            sales,
            tax_rate: TaxRate::default(),
        }
    }

    /// Creates an engine at an explicit tax rate.
    pub fn with_tax_rate(sales: SalesLedger<S>, tax_rate: TaxRate) -> Self {
        CheckoutEngine { sales, tax_rate }
    }

    /// The tax rate this engine applies.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// The sales ledger this engine records into.
    pub fn sales(&self) -> &SalesLedger<S> {
        &self.sales
    }

    /// Totals preview for the payment screen. No validation, no writes.
    pub fn preview_totals(&self, cart: &Cart) -> CheckoutTotals {
        compute_totals(cart, self.tax_rate)
    }

    /// Runs a cash checkout.
    ///
    /// ## Errors
    /// - [`kasir_core::CoreError::EmptyCart`]
    /// - [`kasir_core::CoreError::InsufficientCash`] when `cash < total`
    /// - [`crate::LedgerError`] when the sale could not be persisted
    ///
    /// On any error the ledgers are untouched and the cart is unchanged.
    pub async fn checkout_cash(&self, cart: &Cart, cash: Money) -> CheckoutResult<Receipt> {
        let mut attempt = CheckoutAttempt::new();
        attempt.begin()?;

        let receipt = match build_cash_receipt(
            cart,
            self.tax_rate,
            cash,
            generate_transaction_id(),
            Utc::now(),
        ) {
            Ok(receipt) => receipt,
            Err(err) => {
                attempt.fail();
                warn!(%err, "Cash checkout rejected");
                return Err(err.into());
            }
        };

        self.commit(attempt, receipt).await
    }

    /// Runs a QRIS checkout. The tendered amount is the total by
    /// definition, so only the empty-cart guard applies.
    pub async fn checkout_qris(&self, cart: &Cart) -> CheckoutResult<Receipt> {
        let mut attempt = CheckoutAttempt::new();
        attempt.begin()?;

        let receipt =
            match build_qris_receipt(cart, self.tax_rate, generate_transaction_id(), Utc::now()) {
                Ok(receipt) => receipt,
                Err(err) => {
                    attempt.fail();
                    warn!(%err, "QRIS checkout rejected");
                    return Err(err.into());
                }
            };

        self.commit(attempt, receipt).await
    }

    async fn commit(&self, mut attempt: CheckoutAttempt, receipt: Receipt) -> CheckoutResult<Receipt> {
        if let Err(err) = self.sales.record_transaction(&receipt).await {
            attempt.fail();
            warn!(%err, transaction_id = receipt.transaction_id, "Checkout persist failed");
            return Err(err.into());
        }
        attempt.complete()?;

        info!(
            transaction_id = receipt.transaction_id,
            total = %receipt.total,
            method = ?receipt.method,
            "Checkout completed"
        );
        Ok(receipt)
    }
}

/// Random 6-digit display id printed on the receipt, 100000..=999999.
///
/// Uniqueness is not guaranteed; the sales ledger's own history id is
/// the durable identifier.
pub fn generate_transaction_id() -> u32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

// =============================================================================
// Unit Tests
// =============================================================================
