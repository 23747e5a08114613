//! Account repository for SOOON.

use super::account::{Account, NewAccount};
use super::DbConn;
use crate::error::is_unique_violation;
use crate::{Result, SooonError};

const ACCOUNT_COLUMNS: &str = "id, email, nickname, password, registered_at";

/// Repository for account operations.
pub struct AccountRepository<'c> {
    conn: &'c mut DbConn,
}

impl<'c> AccountRepository<'c> {
    /// Create a repository running on the given connection or transaction.
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    /// Insert a new account.
    ///
    /// Fails with `Conflict` when the email or nickname is already taken.
    pub async fn create(&mut self, new_account: &NewAccount) -> Result<Account> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO accounts (email, nickname, password) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_account.email)
        .bind(&new_account.nickname)
        .bind(&new_account.password)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SooonError::Conflict("email or nickname is already in use".to_string())
            } else {
                e.into()
            }
        })?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| SooonError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(account)
    }

    /// Get an account by email (case-insensitive).
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(account)
    }

    /// Check whether an email is already registered.
    pub async fn exists_by_email(&mut self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?)")
            .bind(email)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(exists)
    }

    /// Check whether a nickname is already taken.
    pub async fn exists_by_nickname(&mut self, nickname: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE nickname = ?)")
                .bind(nickname)
                .fetch_one(&mut *self.conn)
                .await?;
        Ok(exists)
    }
}
