//! Comment service for SOOON.

use tracing::{debug, warn};

use crate::db::{Account, Database, DbConn};
use crate::{Result, SooonError};

use super::comment_repository::CommentRepository;
use super::repository::PostRepository;
use super::types::{NewComment, Post, PostComment};
use super::view::CommentView;

/// Maximum length for a comment (in characters).
pub const MAX_COMMENT_LENGTH: usize = 1_000;

fn validate_comment(comment: &str) -> Result<()> {
    if comment.trim().is_empty() {
        return Err(SooonError::Validation("comment must not be empty".to_string()));
    }
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(SooonError::Validation(format!(
            "comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Caller-supplied comment contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub comment: String,
    pub is_anonymous: bool,
}

impl CommentDraft {
    pub fn new(comment: impl Into<String>, is_anonymous: bool) -> Self {
        Self {
            comment: comment.into(),
            is_anonymous,
        }
    }
}

/// Service for comments on posts.
///
/// Each commenter gets one ordinal per post, reused across all of their
/// comments there, so anonymous labels stay stable within a thread.
pub struct CommentService<'a> {
    db: &'a Database,
}

impl<'a> CommentService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List the comments of a post, oldest first.
    pub async fn list(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let mut tx = self.db.begin().await?;
        let post = find_post(&mut tx, post_id).await?;
        let comments = CommentRepository::new(&mut tx)
            .find_all_by_post(post_id)
            .await?;
        tx.commit().await?;

        Ok(comments
            .iter()
            .map(|c| CommentView::of(c, post.account_id))
            .collect())
    }

    /// Add a comment to a post.
    pub async fn create(
        &self,
        account: &Account,
        post_id: i64,
        draft: &CommentDraft,
    ) -> Result<CommentView> {
        validate_comment(&draft.comment)?;

        let mut tx = self.db.begin_write().await?;
        let post = find_post(&mut tx, post_id).await?;

        let mut repo = CommentRepository::new(&mut tx);
        let order_num = match repo.find_order_num(post_id, account.id).await? {
            Some(n) => n,
            None => repo.max_order_num(post_id).await? + 1,
        };
        let comment = repo
            .save(&NewComment {
                post_id,
                account_id: account.id,
                comment: draft.comment.clone(),
                is_anonymous: draft.is_anonymous,
                order_num,
            })
            .await?;
        tx.commit().await?;

        debug!(
            comment_id = comment.id,
            post_id,
            order_num,
            "Comment created"
        );
        Ok(CommentView::of(&comment, post.account_id))
    }

    /// Edit a comment. Only its writer may do so.
    pub async fn update(
        &self,
        account: &Account,
        comment_id: i64,
        draft: &CommentDraft,
    ) -> Result<CommentView> {
        validate_comment(&draft.comment)?;

        let mut tx = self.db.begin_write().await?;
        let mut comment = find_written(&mut tx, account, comment_id).await?;
        let post = find_post(&mut tx, comment.post_id).await?;

        comment.apply(draft.comment.clone(), draft.is_anonymous);
        let mut repo = CommentRepository::new(&mut tx);
        repo.update(&comment).await?;
        let comment = repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| SooonError::NotFound("comment".to_string()))?;
        tx.commit().await?;

        Ok(CommentView::of(&comment, post.account_id))
    }

    /// Delete a comment. Only its writer may do so.
    pub async fn delete(&self, account: &Account, comment_id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await?;
        find_written(&mut tx, account, comment_id).await?;
        CommentRepository::new(&mut tx).delete(comment_id).await?;
        tx.commit().await?;

        debug!(comment_id, account_id = account.id, "Comment deleted");
        Ok(())
    }
}

async fn find_post(conn: &mut DbConn, post_id: i64) -> Result<Post> {
    PostRepository::new(conn)
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| SooonError::NotFound("post".to_string()))
}

async fn find_written(conn: &mut DbConn, account: &Account, comment_id: i64) -> Result<PostComment> {
    let comment = CommentRepository::new(conn)
        .find_by_id(comment_id)
        .await?
        .ok_or_else(|| SooonError::NotFound("comment".to_string()))?;

    if !comment.is_written_by(account) {
        warn!(
            comment_id,
            account_id = account.id,
            "Denied change to another account's comment"
        );
        return Err(SooonError::PermissionDenied(
            "no permission to change this comment".to_string(),
        ));
    }
    Ok(comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AccountRepository, NewAccount};
    use crate::post::{PostDraft, PostService};

    async fn setup() -> (Database, Account, Account, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = AccountRepository::new(&mut conn);
        let writer = repo
            .create(&NewAccount::new("writer@example.com", "writer", "hash"))
            .await
            .unwrap();
        let reader = repo
            .create(&NewAccount::new("reader@example.com", "reader", "hash"))
            .await
            .unwrap();
        drop(conn);

        let post = PostService::new(&db)
            .create(&writer, &PostDraft::new("T", "C", true))
            .await
            .unwrap();
        (db, writer, reader, post.id)
    }

    #[tokio::test]
    async fn test_ordinals_are_reused_per_account() {
        let (db, writer, reader, post_id) = setup().await;
        let service = CommentService::new(&db);

        let r1 = service
            .create(&reader, post_id, &CommentDraft::new("first", true))
            .await
            .unwrap();
        let w1 = service
            .create(&writer, post_id, &CommentDraft::new("reply", true))
            .await
            .unwrap();
        let r2 = service
            .create(&reader, post_id, &CommentDraft::new("again", true))
            .await
            .unwrap();

        assert_eq!(r1.order_num, 1);
        assert_eq!(w1.order_num, 2);
        assert_eq!(r2.order_num, 1);

        assert_eq!(r1.author, "익명1");
        assert_eq!(w1.author, "익명(글쓴이)");

        let listed = service.list(post_id).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![r1.id, w1.id, r2.id]);
    }

    #[tokio::test]
    async fn test_named_comment_shows_nickname() {
        let (db, _, reader, post_id) = setup().await;
        let view = CommentService::new(&db)
            .create(&reader, post_id, &CommentDraft::new("hello", false))
            .await
            .unwrap();
        assert_eq!(view.author, "reader");
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let (db, _, reader, _) = setup().await;
        let service = CommentService::new(&db);
        assert!(matches!(
            service
                .create(&reader, 999, &CommentDraft::new("x", true))
                .await,
            Err(SooonError::NotFound(_))
        ));
        assert!(matches!(
            service.list(999).await,
            Err(SooonError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_only_writer_may_edit_or_delete() {
        let (db, writer, reader, post_id) = setup().await;
        let service = CommentService::new(&db);
        let comment = service
            .create(&reader, post_id, &CommentDraft::new("mine", true))
            .await
            .unwrap();

        assert!(matches!(
            service
                .update(&writer, comment.id, &CommentDraft::new("x", true))
                .await,
            Err(SooonError::PermissionDenied(_))
        ));
        assert!(matches!(
            service.delete(&writer, comment.id).await,
            Err(SooonError::PermissionDenied(_))
        ));

        let updated = service
            .update(&reader, comment.id, &CommentDraft::new("edited", false))
            .await
            .unwrap();
        assert_eq!(updated.comment, "edited");
        assert_eq!(updated.author, "reader");

        service.delete(&reader, comment.id).await.unwrap();
        assert!(service.list(post_id).await.unwrap().is_empty());
        assert!(matches!(
            service.delete(&reader, comment.id).await,
            Err(SooonError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let (db, _, reader, post_id) = setup().await;
        let result = CommentService::new(&db)
            .create(&reader, post_id, &CommentDraft::new("   ", true))
            .await;
        assert!(matches!(result, Err(SooonError::Validation(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commenters_get_distinct_ordinals() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("comments.db"), 8).await.unwrap();
        let mut accounts = Vec::new();
        {
            let mut conn = db.pool().acquire().await.unwrap();
            let mut repo = AccountRepository::new(&mut conn);
            for i in 0..6 {
                let email = format!("user{i}@example.com");
                let nickname = format!("user{i}");
                accounts.push(
                    repo.create(&NewAccount::new(&email, &nickname, "hash"))
                        .await
                        .unwrap(),
                );
            }
        }
        let post = PostService::new(&db)
            .create(&accounts[0], &PostDraft::new("T", "C", true))
            .await
            .unwrap();

        let tasks: Vec<_> = accounts[1..]
            .iter()
            .cloned()
            .map(|account| {
                let db = db.clone();
                tokio::spawn(async move {
                    CommentService::new(&db)
                        .create(&account, post.id, &CommentDraft::new("hi", true))
                        .await
                })
            })
            .collect();

        let mut ordinals = Vec::new();
        for task in tasks {
            ordinals.push(task.await.unwrap().unwrap().order_num);
        }
        ordinals.sort_unstable();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    }
}
