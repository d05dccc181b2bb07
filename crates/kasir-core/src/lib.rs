//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains all business
//! logic as pure functions and plain data types with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Kasir POS Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (external caller)                 │   │
//! │  │   Product grid ──► Cart UI ──► Tender UI ──► Receipt UI     │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐          │   │
//! │  │  │  types  │ │  money  │ │  cart   │ │ checkout │          │   │
//! │  │  │ Product │ │  Money  │ │  Cart   │ │  totals  │          │   │
//! │  │  │ Receipt │ │ TaxRate │ │ CartItem│ │  guards  │          │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘          │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 kasir-ledger (storage layer)                 │   │
//! │  │       key/value store, stock + sales ledgers, engine         │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Receipt, StockMovement, ...)
//! - [`money`] - Integer money and tax-rate arithmetic (no floats!)
//! - [`cart`] - Cart assembly and mutation
//! - [`checkout`] - Totals, receipt builders, attempt state machine
//! - [`catalog`] - Catalog collaborator trait and in-memory implementation
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output; timestamps and ids are
//!    passed in, never sampled here
//! 2. **No I/O**: storage, network, and hardware access are forbidden
//! 3. **Integer money**: every amount is an i64 in whole rupiah
//! 4. **Explicit errors**: typed enums, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use catalog::{Catalog, InMemoryCatalog};
pub use checkout::{CheckoutAttempt, CheckoutState, CheckoutTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The store's fixed tax rate: 11% PPN, in basis points.
///
/// Configurable on the checkout engine; this is the default every caller
/// in this repository uses.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1100;

/// Maximum distinct lines in a single cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
