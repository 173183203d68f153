//! Input validation helpers
//!
//! Text length limits and pre-network checks. Every failure here is a
//! `ValidationFailed`-family [`AppError`] raised before the gateway is
//! touched.

use shared::error::{AppError, ErrorCode};
use validator::{ValidateEmail, ValidationErrors};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, category, menu item, customer, staff
pub const MAX_NAME_LEN: usize = 200;

/// Order notes, special instructions
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers, table labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MAX_ADDRESS_LEN: usize = 500;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} must not be empty"))
                .with_detail("field", field),
        );
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    if !email.trim().validate_email() {
        return Err(
            AppError::with_message(ErrorCode::InvalidEmail, format!("Invalid email: {email}"))
                .with_detail("field", "email"),
        );
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        )
        .with_detail("field", "password"));
    }
    validate_len(password, "password", MAX_PASSWORD_LEN)
}

/// Flatten `validator` derive errors into one [`AppError`]
pub fn from_validation_errors(errors: ValidationErrors) -> AppError {
    let mut err = AppError::validation("Invalid request");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        err = err.with_detail(field.to_string(), messages.join(", "));
    }
    err
}
