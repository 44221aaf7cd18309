//! # Error Types
//!
//! Domain-specific error types for tendero-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tendero-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                        │
//! │  ├── ValidationError  - Input validation failures                       │
//! │  └── ErrorKind        - Coarse category shared by every layer           │
//! │                                                                         │
//! │  tendero-db errors (separate crate)                                     │
//! │  └── DbError          - Store failures (wraps CoreError)                │
//! │                                                                         │
//! │  Command layer (apps/cli)                                               │
//! │  └── ApiError         - What adapters see: {code, message}             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Adapter       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse failure category.
///
/// Every error raised anywhere in the workspace maps to exactly one kind.
/// Adapters branch on the kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Entity id doesn't exist.
    NotFound,
    /// Unique or foreign key violation (duplicate product code, client legal id).
    ConstraintViolation,
    /// Sale line quantity exceeds available stock.
    InsufficientStock,
    /// Payment amount is zero, negative, or larger than the balance.
    InvalidAmount,
    /// Sale or quote with zero lines, approving an empty quote.
    EmptyInput,
    /// Operation not allowed in the entity's current state.
    InvalidState,
    /// Malformed input (blank names, bad dates, ...).
    Validation,
    /// The store itself failed (connection, I/O, migration).
    Storage,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Sale line references a product id that doesn't exist
    /// - Approving a quote whose product was deleted after quoting
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale line (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { code: "A1", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole sale rejected, nothing persisted
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// A document line whose product was deleted cannot be sold.
    #[error("Product no longer exists: {name}")]
    ProductUnavailable { name: String },

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Sale item not found.
    #[error("Sale item not found: {0}")]
    SaleItemNotFound(i64),

    /// Quote not found.
    #[error("Quote not found: {0}")]
    QuoteNotFound(i64),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(i64),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// A monetary amount is not acceptable.
    ///
    /// ## When This Occurs
    /// - Credit payment ≤ 0
    /// - Credit payment larger than the outstanding balance
    /// - Initial credit payment larger than the sale total
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// A document has no lines.
    #[error("{document} has no items")]
    EmptyInput { document: String },

    /// Quote was already converted into a sale.
    #[error("Quote {quote_id} is already approved")]
    QuoteAlreadyApproved { quote_id: i64, sale_id: Option<i64> },

    /// Report range is inverted.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidAmount error.
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            reason: reason.into(),
        }
    }

    /// Creates an EmptyInput error for the named document.
    pub fn empty(document: impl Into<String>) -> Self {
        CoreError::EmptyInput {
            document: document.into(),
        }
    }

    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_)
            | CoreError::ProductUnavailable { .. }
            | CoreError::SaleNotFound(_)
            | CoreError::SaleItemNotFound(_)
            | CoreError::QuoteNotFound(_)
            | CoreError::ClientNotFound(_)
            | CoreError::CategoryNotFound(_) => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            CoreError::EmptyInput { .. } => ErrorKind::EmptyInput,
            CoreError::QuoteAlreadyApproved { .. } => ErrorKind::InvalidState,
            CoreError::InvalidDateRange { .. } => ErrorKind::Validation,
            CoreError::Validation(e) => e.kind(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date, unknown sale type).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::Duplicate { .. } => ErrorKind::ConstraintViolation,
            _ => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

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
        let err = CoreError::InsufficientStock {
            code: "A1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for A1: available 3, requested 5"
        );
        assert_eq!(CoreError::empty("Quote").to_string(), "Quote has no items");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::SaleNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::invalid_amount("too much").kind(),
            ErrorKind::InvalidAmount
        );
        assert_eq!(
            CoreError::QuoteAlreadyApproved {
                quote_id: 1,
                sale_id: Some(2)
            }
            .kind(),
            ErrorKind::InvalidState
        );

        let dup: CoreError = ValidationError::Duplicate {
            field: "code".to_string(),
            value: "A1".to_string(),
        }
        .into();
        assert_eq!(dup.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }
}
