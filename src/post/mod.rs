//! Posts, comments and likes for SOOON.
//!
//! This module provides:
//! - Entity types for posts, images, comments and likes
//! - Repositories running on a single connection or transaction
//! - `PostService` for post CRUD, paging and likes
//! - `CommentService` for comments with per-post ordinals

mod comment_repository;
mod comment_service;
mod like_repository;
mod repository;
mod service;
mod types;
mod view;

pub use comment_repository::CommentRepository;
pub use comment_service::{CommentDraft, CommentService, MAX_COMMENT_LENGTH};
pub use like_repository::PostLikeRepository;
pub use repository::PostRepository;
pub use service::{PostService, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH};
pub use types::{
    AccountPosts, NewComment, NewPost, PageRequest, Post, PostComment, PostDraft, PostImage,
    PostLike, Slice, SortKey,
};
pub use view::{CommentView, PagedPosts, PostView, ANONYMOUS_AUTHOR_LABEL, ANONYMOUS_LABEL};
