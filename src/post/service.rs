//! Post and like service for SOOON.
//!
//! Every operation runs in one transaction: existence and ownership checks
//! happen before any write, and the transaction commits only on success.

use tracing::{debug, warn};

use crate::db::{Account, AccountRepository, Database, DbConn};
use crate::{Result, SooonError};

use super::like_repository::PostLikeRepository;
use super::repository::PostRepository;
use super::types::{AccountPosts, PageRequest, Post, PostDraft, SortKey};
use super::view::{PagedPosts, PostView};

/// Maximum length for post titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length for post content (in characters).
pub const MAX_CONTENT_LENGTH: usize = 10_000;

fn validate_draft(draft: &PostDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(SooonError::Validation("title must not be empty".to_string()));
    }
    if draft.title.chars().count() > MAX_TITLE_LENGTH {
        return Err(SooonError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    if draft.content.trim().is_empty() {
        return Err(SooonError::Validation("content must not be empty".to_string()));
    }
    if draft.content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(SooonError::Validation(format!(
            "content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

fn post_not_found() -> SooonError {
    SooonError::NotFound("post".to_string())
}

/// Service for post and like operations with ownership checks.
pub struct PostService<'a> {
    db: &'a Database,
}

impl<'a> PostService<'a> {
    /// Create a new PostService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List the posts owned by an account, newest first.
    pub async fn list_by_account(&self, account: &Account) -> Result<Vec<PostView>> {
        let mut tx = self.db.begin().await?;
        let posts = PostRepository::new(&mut tx)
            .find_all_by_account_order_by_created_at_desc(account.id)
            .await?;
        tx.commit().await?;
        Ok(posts.iter().map(PostView::of).collect())
    }

    /// List every post.
    pub async fn list_all(&self) -> Result<Vec<PostView>> {
        let mut tx = self.db.begin().await?;
        let posts = PostRepository::new(&mut tx).find_all().await?;
        tx.commit().await?;
        Ok(posts.iter().map(PostView::of).collect())
    }

    /// Get one page of posts sorted by `order` (`likeCount` or `createdAt`).
    pub async fn list_paged(&self, page: u32, size: u32, order: &str) -> Result<PagedPosts> {
        let sort: SortKey = order.parse()?;
        let request = PageRequest::new(page, size, sort)?;

        let mut tx = self.db.begin().await?;
        let slice = PostRepository::new(&mut tx).find_slice(&request).await?;
        tx.commit().await?;

        debug!(
            page,
            size,
            order = %sort,
            has_next = slice.has_next,
            "Listed post page"
        );
        Ok(PagedPosts::from(slice.map(PostView::from)))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<PostView> {
        let mut tx = self.db.begin().await?;
        let post = PostRepository::new(&mut tx)
            .find_by_id(id)
            .await?
            .ok_or_else(post_not_found)?;
        tx.commit().await?;
        Ok(PostView::of(&post))
    }

    /// Create a post owned by `account`.
    pub async fn create(&self, account: &Account, draft: &PostDraft) -> Result<PostView> {
        validate_draft(draft)?;

        let mut tx = self.db.begin_write().await?;
        let post = PostRepository::new(&mut tx)
            .save(&draft.to_new_post(account))
            .await?;
        tx.commit().await?;

        debug!(post_id = post.id, account_id = account.id, "Post created");
        Ok(PostView::of(&post))
    }

    /// Update a post. Only its owner may do so.
    pub async fn update(&self, account: &Account, id: i64, draft: &PostDraft) -> Result<PostView> {
        validate_draft(draft)?;

        let mut tx = self.db.begin_write().await?;
        let mut post = Self::find_owned(&mut tx, account, id, "update").await?;

        post.apply(draft);
        PostRepository::new(&mut tx).update(&post).await?;
        let post = PostRepository::new(&mut tx)
            .find_by_id(id)
            .await?
            .ok_or_else(post_not_found)?;
        tx.commit().await?;

        debug!(post_id = id, account_id = account.id, "Post updated");
        Ok(PostView::of(&post))
    }

    /// Delete a post. Only its owner may do so.
    pub async fn delete(&self, account: &Account, id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await?;
        Self::find_owned(&mut tx, account, id, "delete").await?;
        PostRepository::new(&mut tx).delete(id).await?;
        tx.commit().await?;

        debug!(post_id = id, account_id = account.id, "Post deleted");
        Ok(())
    }

    /// Hand a post over to another account. Only its owner may do so.
    pub async fn transfer(
        &self,
        account: &Account,
        post_id: i64,
        new_owner_id: i64,
    ) -> Result<PostView> {
        let mut tx = self.db.begin_write().await?;
        Self::find_owned(&mut tx, account, post_id, "transfer").await?;
        AccountRepository::new(&mut tx)
            .get_by_id(new_owner_id)
            .await?
            .ok_or_else(|| SooonError::NotFound("account".to_string()))?;

        let mut posts = PostRepository::new(&mut tx);
        let mut from = AccountPosts::new(
            account.id,
            posts
                .find_all_by_account_order_by_created_at_desc(account.id)
                .await?,
        );
        let mut to = AccountPosts::new(
            new_owner_id,
            posts
                .find_all_by_account_order_by_created_at_desc(new_owner_id)
                .await?,
        );
        from.reassign(post_id, &mut to)?;
        posts.reassign_owner(post_id, to.account_id()).await?;

        let post = posts.find_by_id(post_id).await?.ok_or_else(post_not_found)?;
        tx.commit().await?;

        debug!(post_id, from = account.id, to = new_owner_id, "Post transferred");
        Ok(PostView::of(&post))
    }

    /// Like a post. Each account can like a post once.
    pub async fn like(&self, account: &Account, post_id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await?;
        PostRepository::new(&mut tx)
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)?;

        let mut likes = PostLikeRepository::new(&mut tx);
        if likes
            .find_by_account_and_post(account.id, post_id)
            .await?
            .is_some()
        {
            return Err(SooonError::Conflict("already liked".to_string()));
        }
        likes.save(account.id, post_id).await?;
        tx.commit().await?;

        debug!(post_id, account_id = account.id, "Post liked");
        Ok(())
    }

    /// Remove the like `target_account_id` left on a post.
    ///
    /// Callers may only remove their own like.
    pub async fn unlike(
        &self,
        account: &Account,
        post_id: i64,
        target_account_id: i64,
    ) -> Result<()> {
        Self::require_self(account, target_account_id)?;

        let mut tx = self.db.begin_write().await?;
        PostRepository::new(&mut tx)
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)?;

        let mut likes = PostLikeRepository::new(&mut tx);
        let like = likes
            .find_by_account_and_post(account.id, post_id)
            .await?
            .ok_or_else(|| SooonError::NotFound("like".to_string()))?;
        likes.delete(like.id).await?;
        tx.commit().await?;

        debug!(post_id, account_id = account.id, "Post unliked");
        Ok(())
    }

    /// Succeed if `target_account_id` has liked the post.
    ///
    /// Callers may only check their own like.
    pub async fn check_like(
        &self,
        account: &Account,
        post_id: i64,
        target_account_id: i64,
    ) -> Result<()> {
        Self::require_self(account, target_account_id)?;

        let mut tx = self.db.begin().await?;
        PostRepository::new(&mut tx)
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)?;
        PostLikeRepository::new(&mut tx)
            .find_by_account_and_post(account.id, post_id)
            .await?
            .ok_or_else(|| SooonError::NotFound("like".to_string()))?;
        tx.commit().await?;
        Ok(())
    }

    fn require_self(account: &Account, target_account_id: i64) -> Result<()> {
        if account.is(target_account_id) {
            return Ok(());
        }
        warn!(
            account_id = account.id,
            target_account_id, "Denied access to another account's like"
        );
        Err(SooonError::PermissionDenied(
            "cannot act on another account's like".to_string(),
        ))
    }

    async fn find_owned(
        conn: &mut DbConn,
        account: &Account,
        id: i64,
        action: &str,
    ) -> Result<Post> {
        let post = PostRepository::new(conn)
            .find_by_id(id)
            .await?
            .ok_or_else(post_not_found)?;

        if !post.is_owned_by(account) {
            warn!(
                post_id = id,
                account_id = account.id,
                owner_id = post.account_id,
                "Denied post {action}"
            );
            return Err(SooonError::PermissionDenied(format!(
                "no permission to {action} this post"
            )));
        }
        Ok(post)
    }
}
