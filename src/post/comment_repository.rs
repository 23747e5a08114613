//! Post comment repository for SOOON.

use super::types::{NewComment, PostComment};
use crate::db::DbConn;
use crate::{Result, SooonError};

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.account_id, a.nickname AS author_nickname,
        c.comment, c.is_anonymous, c.order_num, c.created_at, c.updated_at
     FROM post_comments c
     JOIN accounts a ON a.id = c.account_id";

/// Repository for comment operations.
pub struct CommentRepository<'c> {
    conn: &'c mut DbConn,
}

impl<'c> CommentRepository<'c> {
    /// Create a repository running on the given connection or transaction.
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    /// Get a comment by ID.
    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<PostComment>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = ?");
        let comment = sqlx::query_as::<_, PostComment>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(comment)
    }

    /// List the comments of a post, oldest first.
    pub async fn find_all_by_post(&mut self, post_id: i64) -> Result<Vec<PostComment>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.id");
        let comments = sqlx::query_as::<_, PostComment>(&sql)
            .bind(post_id)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(comments)
    }

    /// Ordinal already held by an account on a post, if it has commented there.
    pub async fn find_order_num(&mut self, post_id: i64, account_id: i64) -> Result<Option<i64>> {
        let order_num: Option<i64> = sqlx::query_scalar(
            "SELECT order_num FROM post_comments
             WHERE post_id = ? AND account_id = ?
             ORDER BY id LIMIT 1",
        )
        .bind(post_id)
        .bind(account_id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(order_num)
    }

    /// Highest ordinal on a post, or 0 when it has no comments.
    pub async fn max_order_num(&mut self, post_id: i64) -> Result<i64> {
        let max: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(order_num), 0) FROM post_comments WHERE post_id = ?",
        )
        .bind(post_id)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(max)
    }

    /// Insert a comment.
    pub async fn save(&mut self, new_comment: &NewComment) -> Result<PostComment> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO post_comments (post_id, account_id, comment, is_anonymous, order_num)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_comment.post_id)
        .bind(new_comment.account_id)
        .bind(&new_comment.comment)
        .bind(new_comment.is_anonymous)
        .bind(new_comment.order_num)
        .fetch_one(&mut *self.conn)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| SooonError::NotFound("comment".to_string()))
    }

    /// Persist the editable fields of a comment.
    pub async fn update(&mut self, comment: &PostComment) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE post_comments SET comment = ?, is_anonymous = ?, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(&comment.comment)
        .bind(comment.is_anonymous)
        .bind(comment.id)
        .execute(&mut *self.conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a comment.
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
