//! Read projections returned by the post and comment services.

use serde::Serialize;

use super::types::{Post, PostComment, Slice};
use crate::datetime::to_rfc3339;

/// Label shown in place of an anonymous author.
pub const ANONYMOUS_LABEL: &str = "익명";

/// Label shown for the post author's own anonymous comments.
pub const ANONYMOUS_AUTHOR_LABEL: &str = "익명(글쓴이)";

/// A post as shown to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: i64,
    pub account_id: i64,
    /// Author nickname, or [`ANONYMOUS_LABEL`] for anonymous posts.
    pub author: String,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub like_count: i64,
    pub image_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostView {
    /// Project a post.
    pub fn of(post: &Post) -> Self {
        let author = if post.is_anonymous {
            ANONYMOUS_LABEL.to_string()
        } else {
            post.author_nickname.clone()
        };
        Self {
            id: post.id,
            account_id: post.account_id,
            author,
            title: post.title.clone(),
            content: post.content.clone(),
            is_anonymous: post.is_anonymous,
            like_count: post.like_count,
            image_urls: post.images.iter().map(|i| i.url.clone()).collect(),
            created_at: to_rfc3339(&post.created_at),
            updated_at: to_rfc3339(&post.updated_at),
        }
    }
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self::of(&post)
    }
}

/// One page of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedPosts {
    /// Zero-based page index.
    pub current_page: u32,
    /// Number of posts on this page.
    pub current_size: usize,
    pub has_next_page: bool,
    pub posts: Vec<PostView>,
}

impl From<Slice<PostView>> for PagedPosts {
    fn from(slice: Slice<PostView>) -> Self {
        Self {
            current_page: slice.number,
            current_size: slice.number_of_elements(),
            has_next_page: slice.has_next,
            posts: slice.content,
        }
    }
}

/// A comment as shown to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub account_id: i64,
    /// Nickname or anonymous label.
    pub author: String,
    pub comment: String,
    pub is_anonymous: bool,
    pub order_num: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CommentView {
    /// Project a comment on a post owned by `post_owner_id`.
    pub fn of(comment: &PostComment, post_owner_id: i64) -> Self {
        let author = match (comment.is_anonymous, comment.account_id == post_owner_id) {
            (false, _) => comment.author_nickname.clone(),
            (true, true) => ANONYMOUS_AUTHOR_LABEL.to_string(),
            (true, false) => format!("{ANONYMOUS_LABEL}{}", comment.order_num),
        };
        Self {
            id: comment.id,
            post_id: comment.post_id,
            account_id: comment.account_id,
            author,
            comment: comment.comment.clone(),
            is_anonymous: comment.is_anonymous,
            order_num: comment.order_num,
            created_at: to_rfc3339(&comment.created_at),
            updated_at: to_rfc3339(&comment.updated_at),
        }
    }
}
