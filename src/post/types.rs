//! Post, comment and like entities for SOOON.

use std::fmt;
use std::str::FromStr;

use crate::db::Account;
use crate::{Result, SooonError};

/// An image attached to a post. Only the URL is stored.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostImage {
    /// Image ID.
    pub id: i64,
    /// Owning post.
    pub post_id: i64,
    /// Image location.
    pub url: String,
}

/// A post on the board.
///
/// `like_count` and `author_nickname` are computed by the query that loads
/// the post; neither is stored in the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Owning account.
    pub account_id: i64,
    /// Nickname of the owning account.
    pub author_nickname: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Whether the author is hidden from readers.
    pub is_anonymous: bool,
    /// Number of likes, counted from `post_likes`.
    pub like_count: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Attached images.
    #[sqlx(skip)]
    pub images: Vec<PostImage>,
}

impl Post {
    /// Check if the given account owns this post.
    pub fn is_owned_by(&self, account: &Account) -> bool {
        account.is(self.account_id)
    }

    /// Overwrite the editable fields.
    pub fn apply(&mut self, draft: &PostDraft) {
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.is_anonymous = draft.is_anonymous;
    }

    /// Attach an image to this post, pointing the image back at it.
    ///
    /// Attaching the same image twice is a no-op.
    pub fn add_image(&mut self, mut image: PostImage) {
        image.post_id = self.id;
        if !self.images.iter().any(|i| i.id == image.id) {
            self.images.push(image);
        }
    }
}

/// Caller-supplied post contents, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Whether the author is hidden.
    pub is_anonymous: bool,
    /// Image URLs to attach on creation.
    pub image_urls: Vec<String>,
}

impl PostDraft {
    /// Create a draft without images.
    pub fn new(title: impl Into<String>, content: impl Into<String>, is_anonymous: bool) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_anonymous,
            image_urls: Vec::new(),
        }
    }

    /// Attach image URLs.
    pub fn with_images(mut self, urls: Vec<String>) -> Self {
        self.image_urls = urls;
        self
    }

    /// Build the record to insert for the given owner.
    pub fn to_new_post(&self, account: &Account) -> NewPost {
        NewPost {
            account_id: account.id,
            title: self.title.clone(),
            content: self.content.clone(),
            is_anonymous: self.is_anonymous,
            image_urls: self.image_urls.clone(),
        }
    }
}

/// Data for inserting a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Owning account.
    pub account_id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Whether the author is hidden.
    pub is_anonymous: bool,
    /// Image URLs to attach.
    pub image_urls: Vec<String>,
}

/// All posts owned by one account.
///
/// Moving a post between owners goes through [`AccountPosts::reassign`], which
/// detaches it from this collection, rewrites its owner and attaches it to the
/// target collection in one step.
#[derive(Debug, Clone)]
pub struct AccountPosts {
    account_id: i64,
    posts: Vec<Post>,
}

impl AccountPosts {
    /// Group the posts owned by `account_id`. Posts owned by anyone else are
    /// ignored.
    pub fn new(account_id: i64, posts: Vec<Post>) -> Self {
        let posts = posts
            .into_iter()
            .filter(|p| p.account_id == account_id)
            .collect();
        Self { account_id, posts }
    }

    /// The owning account ID.
    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    /// The owned posts.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Check whether the post is in this collection.
    pub fn contains(&self, post_id: i64) -> bool {
        self.posts.iter().any(|p| p.id == post_id)
    }

    /// Move a post from this owner to `to`.
    pub fn reassign(&mut self, post_id: i64, to: &mut AccountPosts) -> Result<()> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or_else(|| SooonError::NotFound("post".to_string()))?;

        if self.account_id == to.account_id {
            return Ok(());
        }

        let mut post = self.posts.remove(index);
        post.account_id = to.account_id;
        if !to.contains(post.id) {
            to.posts.push(post);
        }
        Ok(())
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostComment {
    /// Comment ID.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Writer.
    pub account_id: i64,
    /// Nickname of the writer.
    pub author_nickname: String,
    /// Comment text.
    pub comment: String,
    /// Whether the writer is hidden.
    pub is_anonymous: bool,
    /// Writer's ordinal within the post, used for anonymous labels.
    pub order_num: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl PostComment {
    /// Check if the given account wrote this comment.
    pub fn is_written_by(&self, account: &Account) -> bool {
        account.is(self.account_id)
    }

    /// Overwrite the editable fields.
    pub fn apply(&mut self, comment: impl Into<String>, is_anonymous: bool) {
        self.comment = comment.into();
        self.is_anonymous = is_anonymous;
    }
}

/// Data for inserting a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Writer.
    pub account_id: i64,
    /// Comment text.
    pub comment: String,
    /// Whether the writer is hidden.
    pub is_anonymous: bool,
    /// Writer's ordinal within the post.
    pub order_num: i64,
}

/// "This account likes this post."
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostLike {
    /// Like ID.
    pub id: i64,
    /// Liking account.
    pub account_id: i64,
    /// Liked post.
    pub post_id: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Sort keys accepted by paged listings. Both sort descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Most liked first.
    LikeCount,
    /// Newest first.
    CreatedAt,
}

impl SortKey {
    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::LikeCount => "likeCount",
            SortKey::CreatedAt => "createdAt",
        }
    }

    /// ORDER BY clause for the post listing query. Ties fall back to newest id.
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            SortKey::LikeCount => "like_count DESC, p.id DESC",
            SortKey::CreatedAt => "p.created_at DESC, p.id DESC",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SooonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "likeCount" => Ok(SortKey::LikeCount),
            "createdAt" => Ok(SortKey::CreatedAt),
            _ => Err(SooonError::InvalidArgument(format!("no such sort key: {s}"))),
        }
    }
}

/// A page request: zero-based page index, page size and sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Items per page (at least 1).
    pub size: u32,
    /// Sort order.
    pub sort: SortKey,
}

impl PageRequest {
    /// Create a page request. A size of zero is rejected.
    pub fn new(page: u32, size: u32, sort: SortKey) -> Result<Self> {
        if size == 0 {
            return Err(SooonError::InvalidArgument(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, size, sort })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// One page of results plus a "has more" flag, without a total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
    /// Whether at least one more item exists after this page.
    pub has_next: bool,
}

impl<T> Slice<T> {
    /// Build a slice from up to `size + 1` fetched rows; the extra row only
    /// signals that a next page exists.
    pub fn from_lookahead(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let has_next = rows.len() > request.size as usize;
        rows.truncate(request.size as usize);
        Self {
            content: rows,
            number: request.page,
            size: request.size,
            has_next,
        }
    }

    /// Number of items on this page.
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Map the items, keeping page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            has_next: self.has_next,
        }
    }
}
