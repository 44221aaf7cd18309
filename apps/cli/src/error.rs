//! # API Error Type
//!
//! Unified error type and response envelope for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tendero                                │
//! │                                                                         │
//! │  Adapter                     Rust Backend                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  tendero credit pay 7 500                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, DbError> from the repository                          │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ──── DbError::QueryFailed("...") ───┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Rule Error? ──── CoreError::InvalidAmount ─── ApiError ────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─────────────────────────────────────── ApiResponse ───►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"success": false, "code": "INVALID_AMOUNT",                           │
//! │   "message": "Invalid amount: payment 5.00 exceeds balance 2.00"}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never return `Err` across the boundary: every outcome is an
//! [`ApiResponse`].

use serde::Serialize;
use tendero_core::error::ErrorKind;
use tendero_core::CoreError;
use tendero_db::DbError;

/// API error carried by a failed [`ApiResponse`].
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 12"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses. One per [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,

    /// Duplicate code / legal id / name, or a dangling reference
    ConstraintViolation,

    InsufficientStock,

    InvalidAmount,

    EmptyInput,

    /// e.g. approving an approved quote
    InvalidState,

    /// Input validation failed
    ValidationError,

    /// The store failed
    DatabaseError,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::ConstraintViolation => ErrorCode::ConstraintViolation,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::InvalidAmount => ErrorCode::InvalidAmount,
            ErrorKind::EmptyInput => ErrorCode::EmptyInput,
            ErrorKind::InvalidState => ErrorCode::InvalidState,
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::Storage => ErrorCode::DatabaseError,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id.to_string()),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts database errors to API errors.
///
/// Storage failures are logged in full and reported generically.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let code = ErrorCode::from(err.kind());
        match err {
            DbError::Domain(e) => ApiError::from(e),
            DbError::ConnectionFailed(_) => ApiError::new(code, "Database connection failed"),
            DbError::MigrationFailed(_) => ApiError::new(code, "Database migration failed"),
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(code, "Database operation failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(code, "Invalid reference")
            }
            DbError::PoolExhausted => ApiError::new(code, "Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(code, "Database operation failed")
            }
            other => ApiError::new(code, other.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::new(err.kind().into(), err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Response Envelope
// =============================================================================

/// What every command returns.
///
/// ```json
/// { "success": true, "message": "Sale created", "data": { "id": 3 } }
/// { "success": false, "code": "EMPTY_INPUT", "message": "Sale has no items" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            code: None,
            data: Some(data),
        }
    }

    pub fn err(error: impl Into<ApiError>) -> Self {
        let error = error.into();
        ApiResponse {
            success: false,
            message: error.message,
            code: Some(error.code),
            data: None,
        }
    }

    /// Wraps a repository result, using `message` on success.
    pub fn from_result<E>(result: Result<T, E>, message: impl Into<String>) -> Self
    where
        E: Into<ApiError>,
    {
        match result {
            Ok(data) => ApiResponse::ok(message, data),
            Err(e) => ApiResponse::err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tendero_core::ValidationError;

    #[test]
    fn test_error_code_follows_kind() {
        let err = ApiError::from(DbError::from(CoreError::invalid_amount("too much")));
        assert_eq!(err.code, ErrorCode::InvalidAmount);
        assert_eq!(err.message, "Invalid amount: too much");

        let err = ApiError::from(DbError::duplicate("products.code", "A1"));
        assert_eq!(err.code, ErrorCode::ConstraintViolation);

        let err = ApiError::from(CoreError::from(ValidationError::Required {
            field: "name".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_envelope_serialization() {
        let ok = ApiResponse::ok("Sale created", 3);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 3);
        assert!(json.get("code").is_none());

        let failed: ApiResponse<i64> = ApiResponse::err(CoreError::empty("Sale"));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "EMPTY_INPUT");
        assert_eq!(json["message"], "Sale has no items");
        assert!(json.get("data").is_none());
    }
}
