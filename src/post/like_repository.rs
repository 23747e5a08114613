//! Post like repository for SOOON.

use super::types::PostLike;
use crate::db::DbConn;
use crate::error::is_unique_violation;
use crate::{Result, SooonError};

/// Repository for like operations.
pub struct PostLikeRepository<'c> {
    conn: &'c mut DbConn,
}

impl<'c> PostLikeRepository<'c> {
    /// Create a repository running on the given connection or transaction.
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    /// Get the like an account left on a post, if any.
    pub async fn find_by_account_and_post(
        &mut self,
        account_id: i64,
        post_id: i64,
    ) -> Result<Option<PostLike>> {
        let like = sqlx::query_as::<_, PostLike>(
            "SELECT id, account_id, post_id, created_at FROM post_likes
             WHERE account_id = ? AND post_id = ?",
        )
        .bind(account_id)
        .bind(post_id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(like)
    }

    /// Record a like.
    ///
    /// Fails with `Conflict` if the pair already exists.
    pub async fn save(&mut self, account_id: i64, post_id: i64) -> Result<PostLike> {
        let like = sqlx::query_as::<_, PostLike>(
            "INSERT INTO post_likes (account_id, post_id) VALUES (?, ?)
             RETURNING id, account_id, post_id, created_at",
        )
        .bind(account_id)
        .bind(post_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SooonError::Conflict("already liked".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(like)
    }

    /// Remove a like by ID.
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_likes WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count likes on a post.
    #[cfg(test)]
    async fn count_by_post(&mut self, post_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM post_likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }
}
