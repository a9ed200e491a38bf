//! Validation errors for catalog payloads
//!
//! Raised before anything is sent to the server: product form parsing,
//! offer arithmetic and admin registration checks.

use rust_decimal::Decimal;
use thiserror::Error;

/// Client-side validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left empty
    #[error("{0} is required")]
    Required(&'static str),

    /// Email does not look like `local@domain.tld`
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Password has the wrong number of characters
    #[error("Password must be exactly {0} characters long")]
    PasswordLength(usize),

    /// Password has no digit
    #[error("Password must contain at least one number")]
    PasswordDigit,

    /// Price text is not a number
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Discount percentage outside 0..=100
    #[error("Enter a valid discount 0-100 (got {0})")]
    DiscountOutOfRange(Decimal),

    /// Original price must be positive
    #[error("Invalid original price: {0}")]
    InvalidOriginalPrice(Decimal),
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
