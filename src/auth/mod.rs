//! Authentication module for SOOON.
//!
//! This module provides password hashing, signup validation, and the
//! account/session service used by the web layer.

mod password;
mod service;
pub mod validation;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use service::{AuthService, Signup};
pub use validation::ValidationError;
