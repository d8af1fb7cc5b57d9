//! # Error Types
//!
//! Domain-specific error types for lavka-core.
//!
//! ## Error Hierarchy
//! ```text
//! lavka-core errors (this file)
//! ├── CoreError        - Domain rule violations
//! └── ValidationError  - Input validation failures
//!
//! lavka-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! API errors (apps/api)
//! └── ApiError         - What HTTP clients see
//!
//! Flow: ValidationError → CoreError → DbError → ApiError → client
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id or barcode.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// User lookup by username returned nothing.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Registration attempted with a username that is already taken.
    #[error("User '{0}' already exists")]
    UserAlreadyExists(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must be non-negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (bad characters, malformed value).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::ProductNotFound("4870001234567".to_string());
        assert_eq!(err.to_string(), "Product not found: 4870001234567");

        let err = CoreError::UserAlreadyExists("admin".to_string());
        assert_eq!(err.to_string(), "User 'admin' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku_code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
