//! # Validation Module
//!
//! Input validation for catalog payloads and document lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Adapter (CLI flags, JSON payloads)                            │
//! │  └── Type validation (deserialization)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories (tendero-db)                                     │
//! │  └── THIS MODULE: shape checks before any SQL runs                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (code, legal_id, document numbers)              │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tendero_core::validation::{validate_product_code, validate_quantity};
//!
//! validate_product_code("A1").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{ClientInput, ProductInput};
use crate::{MAX_DOCUMENT_LINES, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CODE_LEN: usize = 50;
const MAX_NAME_LEN: usize = 200;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - No whitespace inside (codes are typed or scanned)
///
/// ## Example
/// ```rust
/// use tendero_core::validation::validate_product_code;
///
/// assert!(validate_product_code("ARZ-500").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    required("code", code, MAX_CODE_LEN)?;

    if code.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product, client, category).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    required(field, name, MAX_NAME_LEN)
}

/// Validates a client's national id / tax id.
pub fn validate_legal_id(legal_id: &str) -> ValidationResult<()> {
    required("legal_id", legal_id, MAX_CODE_LEN)
}

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (no filter)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term, or `None` when there is nothing to filter by.
pub fn validate_search_term(term: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(term) = term.map(str::trim) else {
        return Ok(None);
    };

    if term.is_empty() {
        return Ok(None);
    }

    if term.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(Some(term.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, unused special price)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use tendero_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("sale_price", 1099).is_ok());
/// assert!(validate_price_cents("sale_price", 0).is_ok());
/// assert!(validate_price_cents("sale_price", -100).is_err());
/// assert!(validate_price_cents("sale_price", i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock figure (on hand or reorder threshold).
pub fn validate_stock(field: &str, units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines of a sale or quote.
///
/// An empty document is not a validation failure here: it has its own
/// error kind and is reported by the engine.
pub fn validate_line_count(lines: usize) -> ValidationResult<()> {
    if lines > MAX_DOCUMENT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_DOCUMENT_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

pub fn validate_client_input(input: &ClientInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_legal_id(&input.legal_id)?;
    Ok(())
}

pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_product_code(&input.code)?;
    validate_name("name", &input.name)?;
    validate_price_cents("purchase_price", input.purchase_price_cents)?;
    validate_price_cents("sale_price", input.sale_price_cents)?;
    validate_price_cents("special_price", input.special_price_cents)?;
    validate_stock("stock", input.stock)?;
    validate_stock("min_stock", input.min_stock)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
