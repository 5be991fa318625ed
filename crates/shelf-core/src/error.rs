//! # Error Types
//!
//! Domain-specific error types for shelf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shelf-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shelf-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  apps/api errors                                                       │
//! │  ├── ServiceError     - Core/DB errors with context                    │
//! │  └── ApiError         - Status code + JSON message                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (book id, field name, etc.)
//! 3. Every rejection is its own variant, never a bare String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule rejections.
///
/// None of these are fatal: each one tells the caller exactly which rule the
/// request broke.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order must contain at least one item.
    #[error("items cannot be empty")]
    EmptyOrder,

    /// Book cannot be found (never existed or was soft-deleted).
    #[error("book not found: {0}")]
    BookNotFound(i64),

    /// Registration with an email that already has an account.
    #[error("email already exists")]
    EmailTaken,

    /// Login with an email that has no account.
    #[error("invalid email")]
    UnknownEmail,

    /// Login with a password that does not match the stored hash.
    #[error("invalid password")]
    PasswordMismatch,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation in the HTTP handlers.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} cannot be empty")]
    Required { field: String },

    /// Numeric value below its minimum.
    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: i64 },

    /// Arithmetic on the value left the i64 range.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Invalid format (e.g., malformed email, weak password).
    #[error("invalid {field}, {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
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
        assert_eq!(CoreError::BookNotFound(42).to_string(), "book not found: 42");
        assert_eq!(CoreError::EmailTaken.to_string(), "email already exists");
        assert_eq!(CoreError::EmptyOrder.to_string(), "items cannot be empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("receiver city");
        assert_eq!(err.to_string(), "receiver city cannot be empty");

        let err = ValidationError::TooSmall {
            field: "quantity".to_string(),
            min: 1,
        };
        assert_eq!(err.to_string(), "quantity must be at least 1");

        let err = ValidationError::Overflow {
            field: "total price".to_string(),
        };
        assert_eq!(err.to_string(), "total price is too large");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("address").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "address cannot be empty");
    }
}
