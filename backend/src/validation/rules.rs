//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Validates password strength at registration.
///
/// Requirements:
/// - At least 8 characters, at most 128
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(ValidationError::new("password_invalid_length"));
    }
    Ok(())
}

/// Validates a listing price.
///
/// Requirements:
/// - Finite (malformed numeric input must never slip through as NaN)
/// - Non-negative
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::new("price_not_finite"));
    }
    if price < 0.0 {
        return Err(ValidationError::new("price_negative"));
    }
    Ok(())
}
