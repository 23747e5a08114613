//! Request DTOs for the REST API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};
use crate::auth::Signup;
use crate::post::{CommentDraft, PostDraft};

fn default_anonymous() -> bool {
    true
}

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Must be 8 to 128 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 20, message = "Must be 1 to 20 characters"),
        custom(function = "no_control_chars")
    )]
    pub nickname: String,
}

impl From<SignupRequest> for Signup {
    fn from(req: SignupRequest) -> Self {
        Signup::new(req.email, req.password, req.nickname)
    }
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Logout request.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to invalidate.
    pub refresh_token: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Post ownership transfer request.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Account receiving the post.
    pub account_id: i64,
}

/// Create or update a post.
#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(
        length(max = 100, message = "Title is too long"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub title: String,
    #[validate(
        length(max = 10000, message = "Content is too long"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub content: String,
    /// Defaults to anonymous.
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
    /// Image URLs; only used on creation.
    #[serde(default)]
    #[validate(length(max = 10, message = "Too many images"))]
    pub image_urls: Vec<String>,
}

impl From<PostRequest> for PostDraft {
    fn from(req: PostRequest) -> Self {
        PostDraft::new(req.title, req.content, req.is_anonymous).with_images(req.image_urls)
    }
}

/// Create or update a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(
        length(max = 1000, message = "Comment is too long"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub comment: String,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
}

impl From<CommentRequest> for CommentDraft {
    fn from(req: CommentRequest) -> Self {
        CommentDraft::new(req.comment, req.is_anonymous)
    }
}

/// Query for `GET /posts/paged`.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Zero-based page index (default 0).
    #[serde(default)]
    pub page: u32,
    /// Page size (default from config, capped by config).
    pub size: Option<u32>,
    /// `likeCount` or `createdAt` (default).
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_order() -> String {
    "createdAt".to_string()
}

/// Query for `GET /auth/check-email`.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Query for `GET /auth/check-nickname`.
#[derive(Debug, Deserialize)]
pub struct NicknameQuery {
    pub nickname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_defaults() {
        let req: PostRequest =
            serde_json::from_str(r#"{"title":"T","content":"C"}"#).unwrap();
        assert!(req.is_anonymous);
        assert!(req.image_urls.is_empty());
        assert!(req.validate().is_ok());

        let draft = PostDraft::from(req);
        assert_eq!(draft.title, "T");
        assert!(draft.is_anonymous);
    }

    #[test]
    fn test_post_request_validation() {
        let req: PostRequest =
            serde_json::from_str(r#"{"title":"   ","content":"C","is_anonymous":false}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_signup_request_validation() {
        let ok = SignupRequest {
            email: "a@sungshin.ac.kr".to_string(),
            password: "password123".to_string(),
            nickname: "채피".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = SignupRequest {
            email: "nope".to_string(),
            password: "short".to_string(),
            nickname: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("nickname"));
    }

    #[test]
    fn test_page_query_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 0);
        assert_eq!(q.size, None);
        assert_eq!(q.order, "createdAt");
    }
}
