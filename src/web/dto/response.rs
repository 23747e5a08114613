//! Response DTOs for the REST API.

use serde::Serialize;

use crate::datetime::to_rfc3339;
use crate::db::Account;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Tokens returned by signup, login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Access token (JWT).
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
    pub account: AccountInfo,
}

/// Public account information.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub registered_at: String,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            nickname: account.nickname.clone(),
            registered_at: to_rfc3339(&account.registered_at),
        }
    }
}

/// Result of an email or nickname availability check.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Result of a like lookup.
#[derive(Debug, Serialize)]
pub struct LikeStatus {
    pub post_id: i64,
    pub account_id: i64,
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_info_omits_password() {
        let account = Account {
            id: 1,
            email: "a@b.kr".to_string(),
            nickname: "a".to_string(),
            password: "$argon2id$secret".to_string(),
            registered_at: "2024-01-01 00:00:00".to_string(),
        };
        let json = serde_json::to_value(ApiResponse::new(AccountInfo::from(&account))).unwrap();
        assert_eq!(json["data"]["email"], "a@b.kr");
        assert_eq!(json["data"]["registered_at"], "2024-01-01T00:00:00Z");
        assert!(json["data"].get("password").is_none());
    }
}
