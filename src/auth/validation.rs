//! Input validation for SOOON signup.

use thiserror::Error;

use super::password::{validate_password, PasswordError};

/// Maximum nickname length (in characters).
pub const MAX_NICKNAME_LENGTH: usize = 20;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("password must be at least {} characters", super::password::MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("password must be at most {} characters", super::password::MAX_PASSWORD_LENGTH)]
    PasswordTooLong,

    #[error("nickname cannot be empty")]
    NicknameEmpty,

    #[error("nickname must be at most {MAX_NICKNAME_LENGTH} characters")]
    NicknameTooLong,

    /// Control characters or surrounding whitespace.
    #[error("nickname contains invalid characters")]
    NicknameInvalidChars,

    #[error("email cannot be empty")]
    EmailEmpty,

    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    #[error("invalid email format")]
    EmailInvalidFormat,
}

/// Validate a nickname: 1-20 characters, no control characters, no leading
/// or trailing whitespace.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.trim().is_empty() {
        return Err(ValidationError::NicknameEmpty);
    }
    if nickname.chars().count() > MAX_NICKNAME_LENGTH {
        return Err(ValidationError::NicknameTooLong);
    }
    if nickname.chars().any(|c| c.is_control()) || nickname.trim() != nickname {
        return Err(ValidationError::NicknameInvalidChars);
    }
    Ok(())
}

/// Validate an email address.
///
/// The check is structural only: one `@`, a non-empty local part and a
/// dotted domain without empty labels.
///
/// ```
/// use sooon::auth::validation::validate_email;
///
/// assert!(validate_email("user@sungshin.ac.kr").is_ok());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or(ValidationError::EmailInvalidFormat)?;
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if !domain.contains('.') || domain.split('.').any(|label| label.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

/// Validate all signup fields, returning the first failure.
pub fn validate_signup(email: &str, password: &str, nickname: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password).map_err(|e| match e {
        PasswordError::TooLong => ValidationError::PasswordTooLong,
        _ => ValidationError::PasswordTooShort,
    })?;
    validate_nickname(nickname)?;
    Ok(())
}
