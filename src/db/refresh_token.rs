//! Refresh token repository for JWT sessions.

use super::DbConn;
use crate::{Result, SooonError};

/// Stored refresh token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    /// Token ID.
    pub id: i64,
    /// Owning account.
    pub account_id: i64,
    /// Opaque token string.
    pub token: String,
    /// Expiration timestamp (UTC, `YYYY-MM-DD HH:MM:SS`).
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Revocation timestamp (None if still usable).
    pub revoked_at: Option<String>,
}

/// New refresh token for creation.
pub struct NewRefreshToken {
    /// Owning account.
    pub account_id: i64,
    /// Opaque token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

impl NewRefreshToken {
    /// Build a token that expires `days` from now.
    pub fn expiring_in_days(account_id: i64, token: impl Into<String>, days: u64) -> Self {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(days as i64);
        Self {
            account_id,
            token: token.into(),
            expires_at: expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

const TOKEN_COLUMNS: &str = "id, account_id, token, expires_at, created_at, revoked_at";

/// Repository for refresh token operations.
pub struct RefreshTokenRepository<'c> {
    conn: &'c mut DbConn,
}

impl<'c> RefreshTokenRepository<'c> {
    /// Create a repository running on the given connection or transaction.
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    /// Store a new refresh token.
    pub async fn create(&mut self, new_token: &NewRefreshToken) -> Result<RefreshToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO refresh_tokens (account_id, token, expires_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(new_token.account_id)
        .bind(&new_token.token)
        .bind(&new_token.expires_at)
        .fetch_one(&mut *self.conn)
        .await?;

        let sql = format!("SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE id = ?");
        sqlx::query_as::<_, RefreshToken>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| SooonError::NotFound("refresh token".to_string()))
    }

    /// Get a token by its string, regardless of state.
    pub async fn get_by_token(&mut self, token: &str) -> Result<Option<RefreshToken>> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token = ?");
        let result = sqlx::query_as::<_, RefreshToken>(&sql)
            .bind(token)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(result)
    }

    /// Get a token that is neither expired nor revoked.
    pub async fn get_valid_token(&mut self, token: &str) -> Result<Option<RefreshToken>> {
        let sql = format!(
            "SELECT {TOKEN_COLUMNS} FROM refresh_tokens
             WHERE token = ? AND revoked_at IS NULL AND expires_at > datetime('now')"
        );
        let result = sqlx::query_as::<_, RefreshToken>(&sql)
            .bind(token)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(result)
    }

    /// Revoke a token. Returns false if it was unknown or already revoked.
    pub async fn revoke(&mut self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = datetime('now')
             WHERE token = ? AND revoked_at IS NULL",
        )
        .bind(token)
        .execute(&mut *self.conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired and revoked tokens.
    pub async fn cleanup_expired(&mut self) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens
             WHERE expires_at < datetime('now') OR revoked_at IS NOT NULL",
        )
        .execute(&mut *self.conn)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AccountRepository, NewAccount};
    use crate::Database;

    async fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let account = AccountRepository::new(&mut conn)
            .create(&NewAccount::new("token@example.com", "token", "hash"))
            .await
            .unwrap();
        drop(conn);
        (db, account.id)
    }

    fn token(account_id: i64, token: &str, expires_at: &str) -> NewRefreshToken {
        NewRefreshToken {
            account_id,
            token: token.to_string(),
            expires_at: expires_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (db, account_id) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = RefreshTokenRepository::new(&mut conn);

        let created = repo
            .create(&NewRefreshToken::expiring_in_days(account_id, "abc", 7))
            .await
            .unwrap();
        assert_eq!(created.account_id, account_id);
        assert!(created.revoked_at.is_none());

        assert!(repo.get_by_token("abc").await.unwrap().is_some());
        assert!(repo.get_valid_token("abc").await.unwrap().is_some());
        assert!(repo.get_by_token("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_token_is_not_valid() {
        let (db, account_id) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = RefreshTokenRepository::new(&mut conn);

        repo.create(&token(account_id, "old", "2000-01-01 00:00:00"))
            .await
            .unwrap();
        assert!(repo.get_valid_token("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_then_cleanup() {
        let (db, account_id) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = RefreshTokenRepository::new(&mut conn);

        repo.create(&token(account_id, "revoke-me", "2099-12-31 23:59:59"))
            .await
            .unwrap();
        repo.create(&token(account_id, "expired", "2000-01-01 00:00:00"))
            .await
            .unwrap();
        repo.create(&token(account_id, "keep", "2099-12-31 23:59:59"))
            .await
            .unwrap();

        assert!(repo.revoke("revoke-me").await.unwrap());
        assert!(!repo.revoke("revoke-me").await.unwrap());
        assert!(repo.get_valid_token("revoke-me").await.unwrap().is_none());

        assert_eq!(repo.cleanup_expired().await.unwrap(), 2);
        assert!(repo.get_by_token("keep").await.unwrap().is_some());
        assert!(repo.get_by_token("expired").await.unwrap().is_none());
    }
}
