//! API handlers.

pub mod auth;
pub mod comment;
pub mod post;

pub use auth::*;
pub use comment::*;
pub use post::*;
