//! # Validation Module
//!
//! Input validation rules for catalog and account data.
//!
//! Validation runs in the service layer before a row is written; the
//! database constraints (NOT NULL, UNIQUE) remain the last line behind it.

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Product Validators
// =============================================================================

/// Validates and normalizes an SKU code.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
/// - Normalized to uppercase (the upstream inventory system is
///   case-insensitive about codes)
pub fn validate_sku_code(sku_code: &str) -> ValidationResult<String> {
    let sku_code = sku_code.trim();

    if sku_code.is_empty() {
        return Err(ValidationError::Required {
            field: "sku_code".to_string(),
        });
    }

    if sku_code.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "sku_code".to_string(),
            max: 64,
        });
    }

    if !sku_code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku_code".to_string(),
            reason: "must contain only letters, digits, hyphens and underscores".to_string(),
        });
    }

    Ok(sku_code.to_uppercase())
}

/// Validates a product display name.
pub fn validate_sku_name(sku_name: &str) -> ValidationResult<()> {
    let sku_name = sku_name.trim();

    if sku_name.is_empty() {
        return Err(ValidationError::Required {
            field: "sku_name".to_string(),
        });
    }

    if sku_name.len() > 255 {
        return Err(ValidationError::TooLong {
            field: "sku_name".to_string(),
            max: 255,
        });
    }

    Ok(())
}

/// Validates a price or cost price. Zero is allowed (unpriced imports carry 0).
pub fn validate_price(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a login name.
///
/// ## Rules
/// - 3 to 50 characters
/// - Letters, digits, dots, hyphens and underscores only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, digits, dots, hyphens and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a registration password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
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
    fn test_validate_sku_code() {
        assert_eq!(validate_sku_code("abc-123").unwrap(), "ABC-123");
        assert_eq!(validate_sku_code("  SKU_7  ").unwrap(), "SKU_7");

        assert!(validate_sku_code("").is_err());
        assert!(validate_sku_code("has space").is_err());
        assert!(validate_sku_code(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_sku_name() {
        assert!(validate_sku_name("Хлеб белый 500г").is_ok());
        assert!(validate_sku_name("").is_err());
        assert!(validate_sku_name("   ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Decimal::ZERO).is_ok());
        assert!(validate_price("price", Decimal::new(49999, 2)).is_ok());
        assert!(validate_price("cost_price", Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("j.doe-42").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username(&"x".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct-horse").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
    }
}
