//! # tendero-core: Pure Business Logic for Tendero
//!
//! This crate contains the rules of the shop as pure functions: money
//! arithmetic, credit balances, document numbering and report grouping.
//! It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tendero Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Adapters (CLI, desktop, ...)                     │   │
//! │  │   create_sale, add_credit_payment, approve_quote, sales_report  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                tendero-db (store + engine)                      │   │
//! │  │        SQLite, migrations, repositories, transactions           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tendero-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │ sequence │ │ report  │ │ credit │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, Sale, Quote, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`credit`] - Cash/credit balance rules
//! - [`sequence`] - Invoice and quote number formatting
//! - [`report`] - Sales report period grouping
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tendero_core::money::{document_total, line_total};
//! use tendero_core::sequence::format_document_number;
//! use tendero_core::Money;
//!
//! let subtotal = line_total(Money::from_cents(250), 4).unwrap();
//! assert_eq!(document_total([subtotal]).unwrap().cents(), 1000);
//! assert_eq!(format_document_number("FACT", 10), "FACT-010");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credit;
pub mod error;
pub mod money;
pub mod report;
pub mod sequence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for invoice numbers (`FACT-001`).
pub const INVOICE_PREFIX: &str = "FACT";

/// Prefix for quote numbers (`COT-001`).
pub const QUOTE_PREFIX: &str = "COT";

/// Name stored on a quote line whose product no longer exists and the
/// caller supplied no name of its own.
pub const DELETED_PRODUCT_LABEL: &str = "Producto eliminado";

/// Maximum number of lines accepted in a single sale or quote.
pub const MAX_DOCUMENT_LINES: usize = 200;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Maximum unit price in cents (1 000 000 000.00).
///
/// Together with [`MAX_ITEM_QUANTITY`] and [`MAX_DOCUMENT_LINES`] this keeps
/// every document total well inside an i64.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;
