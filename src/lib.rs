//! SOOON - community bulletin board backend
//!
//! Accounts, posts, comments and likes over an SQLite store, served as a
//! JWT-secured REST API.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod post;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, AuthService, PasswordError, Signup,
    ValidationError,
};
pub use config::Config;
pub use db::{Account, AccountRepository, Database, NewAccount};
pub use error::{Result, SooonError};
pub use post::{
    AccountPosts, CommentService, CommentView, PagedPosts, PageRequest, Post, PostDraft,
    PostService, PostView, Slice, SortKey,
};
pub use web::WebServer;
