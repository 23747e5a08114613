//! Account signup, login and refresh-token sessions.

use tracing::{debug, info, warn};

use crate::db::{
    Account, AccountRepository, Database, NewAccount, NewRefreshToken, RefreshTokenRepository,
};
use crate::{Result, SooonError};

use super::password::{hash_password, verify_password};
use super::validation::validate_signup;

/// Message shared by every login failure so callers cannot probe for emails.
const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Signup data.
#[derive(Debug, Clone)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

impl Signup {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            nickname: nickname.into(),
        }
    }
}

/// Service for account authentication.
pub struct AuthService<'a> {
    db: &'a Database,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// Fails with `Validation` on malformed input and `Conflict` when the
    /// email or nickname is taken.
    pub async fn signup(&self, signup: &Signup) -> Result<Account> {
        validate_signup(&signup.email, &signup.password, &signup.nickname)
            .map_err(|e| SooonError::Validation(e.to_string()))?;
        let password_hash =
            hash_password(&signup.password).map_err(|e| SooonError::Validation(e.to_string()))?;

        let mut tx = self.db.begin_write().await?;
        let mut repo = AccountRepository::new(&mut tx);
        if repo.exists_by_email(&signup.email).await? {
            return Err(SooonError::Conflict("email is already in use".to_string()));
        }
        if repo.exists_by_nickname(&signup.nickname).await? {
            return Err(SooonError::Conflict("nickname is already in use".to_string()));
        }

        let account = repo
            .create(&NewAccount::new(
                &signup.email,
                &signup.nickname,
                password_hash,
            ))
            .await?;
        tx.commit().await?;

        info!(account_id = account.id, "Account registered");
        Ok(account)
    }

    /// Check credentials and return the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account> {
        let mut conn = self.db.pool().acquire().await?;
        let account = AccountRepository::new(&mut conn)
            .get_by_email(email)
            .await?
            .ok_or_else(|| SooonError::Auth(INVALID_CREDENTIALS.to_string()))?;

        if verify_password(password, &account.password).is_err() {
            warn!(account_id = account.id, "Login failed: wrong password");
            return Err(SooonError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        debug!(account_id = account.id, "Login succeeded");
        Ok(account)
    }

    /// Get an account by ID.
    pub async fn account(&self, id: i64) -> Result<Account> {
        let mut conn = self.db.pool().acquire().await?;
        AccountRepository::new(&mut conn)
            .get_by_id(id)
            .await?
            .ok_or_else(|| SooonError::NotFound("account".to_string()))
    }

    /// True if no account uses this email.
    pub async fn email_available(&self, email: &str) -> Result<bool> {
        let mut conn = self.db.pool().acquire().await?;
        let taken = AccountRepository::new(&mut conn)
            .exists_by_email(email)
            .await?;
        Ok(!taken)
    }

    /// True if no account uses this nickname.
    pub async fn nickname_available(&self, nickname: &str) -> Result<bool> {
        let mut conn = self.db.pool().acquire().await?;
        let taken = AccountRepository::new(&mut conn)
            .exists_by_nickname(nickname)
            .await?;
        Ok(!taken)
    }

    /// Store a refresh token for a freshly authenticated account.
    pub async fn start_session(&self, account: &Account, token: &str, days: u64) -> Result<()> {
        let mut conn = self.db.pool().acquire().await?;
        RefreshTokenRepository::new(&mut conn)
            .create(&NewRefreshToken::expiring_in_days(account.id, token, days))
            .await?;
        Ok(())
    }

    /// Exchange a valid refresh token for `new_token`.
    ///
    /// The old token is revoked in the same transaction that stores the new
    /// one. Unknown, expired or revoked tokens fail with `Auth`.
    pub async fn rotate_session(&self, old_token: &str, new_token: &str, days: u64) -> Result<Account> {
        let mut tx = self.db.begin_write().await?;
        let stored = RefreshTokenRepository::new(&mut tx)
            .get_valid_token(old_token)
            .await?
            .ok_or_else(|| SooonError::Auth("invalid or expired refresh token".to_string()))?;

        let account = AccountRepository::new(&mut tx)
            .get_by_id(stored.account_id)
            .await?
            .ok_or_else(|| SooonError::Auth("account no longer exists".to_string()))?;

        let mut tokens = RefreshTokenRepository::new(&mut tx);
        tokens.revoke(old_token).await?;
        tokens
            .create(&NewRefreshToken::expiring_in_days(account.id, new_token, days))
            .await?;
        tx.commit().await?;

        debug!(account_id = account.id, "Refresh token rotated");
        Ok(account)
    }

    /// Revoke a refresh token. Unknown tokens are ignored.
    pub async fn end_session(&self, token: &str) -> Result<()> {
        let mut conn = self.db.pool().acquire().await?;
        RefreshTokenRepository::new(&mut conn).revoke(token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, nickname: &str) -> Signup {
        Signup::new(email, "password123", nickname)
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let db = Database::open_in_memory().await.unwrap();
        let service = AuthService::new(&db);

        let account = service
            .signup(&signup("chaeppy@sungshin.ac.kr", "채피"))
            .await
            .unwrap();
        assert!(account.password.starts_with("$argon2id$"));

        let logged_in = service
            .login("chaeppy@sungshin.ac.kr", "password123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, account.id);
        assert_eq!(service.account(account.id).await.unwrap(), account);
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let db = Database::open_in_memory().await.unwrap();
        let service = AuthService::new(&db);
        service
            .signup(&signup("a@example.com", "alpha"))
            .await
            .unwrap();

        let wrong = service.login("a@example.com", "wrongpass").await.unwrap_err();
        let unknown = service
            .login("nobody@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(wrong, SooonError::Auth(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_signup_conflicts_and_availability() {
        let db = Database::open_in_memory().await.unwrap();
        let service = AuthService::new(&db);
        service
            .signup(&signup("a@example.com", "alpha"))
            .await
            .unwrap();

        assert!(matches!(
            service.signup(&signup("A@example.com", "beta")).await,
            Err(SooonError::Conflict(_))
        ));
        assert!(matches!(
            service.signup(&signup("b@example.com", "alpha")).await,
            Err(SooonError::Conflict(_))
        ));

        assert!(!service.email_available("a@example.com").await.unwrap());
        assert!(service.email_available("b@example.com").await.unwrap());
        assert!(!service.nickname_available("alpha").await.unwrap());
        assert!(service.nickname_available("beta").await.unwrap());
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let db = Database::open_in_memory().await.unwrap();
        let service = AuthService::new(&db);

        assert!(matches!(
            service.signup(&signup("not-an-email", "alpha")).await,
            Err(SooonError::Validation(_))
        ));
        assert!(matches!(
            service
                .signup(&Signup::new("a@example.com", "short", "alpha"))
                .await,
            Err(SooonError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_session_rotation_and_logout() {
        let db = Database::open_in_memory().await.unwrap();
        let service = AuthService::new(&db);
        let account = service
            .signup(&signup("a@example.com", "alpha"))
            .await
            .unwrap();

        service.start_session(&account, "first", 7).await.unwrap();
        let rotated = service.rotate_session("first", "second", 7).await.unwrap();
        assert_eq!(rotated.id, account.id);

        assert!(matches!(
            service.rotate_session("first", "third", 7).await,
            Err(SooonError::Auth(_))
        ));

        service.end_session("second").await.unwrap();
        assert!(matches!(
            service.rotate_session("second", "fourth", 7).await,
            Err(SooonError::Auth(_))
        ));
        service.end_session("never-issued").await.unwrap();
    }
}
