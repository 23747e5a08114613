//! REST API for SOOON.
//!
//! JSON endpoints under `/api/v1` for accounts, posts, likes and comments.
//! Everything except signup, login, token refresh and the health check
//! requires a Bearer JWT.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
