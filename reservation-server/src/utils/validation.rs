//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: category, restaurant, promotion, contact name
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, booking numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that an optional name, if present, is non-blank and within limits.
pub fn validate_optional_name(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, MAX_NAME_LEN),
        None => Ok(()),
    }
}

/// Shape check only: one `@`, non-empty local part, dotted domain.
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!("{field} is not a valid email address")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Chicken", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "description", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "description", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_name(&Some(" ".into()), "name").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("kim@example.com", "contact_email").is_ok());
        assert!(validate_email(" kim@mail.example.co.kr ", "contact_email").is_ok());
        for bad in ["kim", "@example.com", "kim@", "kim@example", "kim@@example.com", "k im@example.com", "kim@example..com"] {
            assert!(validate_email(bad, "contact_email").is_err(), "{bad} accepted");
        }
    }
}
