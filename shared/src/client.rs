//! Client-related types for the admin auth endpoints
//!
//! Request/response bodies for `/api/admin/login` and `/api/admin/register`.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Exact password length the register endpoint accepts
pub const PASSWORD_LEN: usize = 8;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Admin registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the request before it is sent
    ///
    /// All fields required, a plausible email, and a password of exactly
    /// [`PASSWORD_LEN`] characters containing a digit.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.email.is_empty() {
            return Err(ValidationError::Required("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() != PASSWORD_LEN {
            return Err(ValidationError::PasswordLength(PASSWORD_LEN));
        }
        if !self.password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::PasswordDigit);
        }
        Ok(())
    }
}

/// Generic `{ "message": "..." }` reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// `local@domain.tld`: no whitespace, one `@`, and a dot inside the domain
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
