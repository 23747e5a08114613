//! Account model for SOOON.

/// A registered account.
///
/// Accounts own posts and comments through back-references only; deleting a
/// post never touches its account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Login email (unique, case-insensitive).
    pub email: String,
    /// Display name (unique).
    pub nickname: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Registration timestamp.
    pub registered_at: String,
}

impl Account {
    /// Check whether this account is the given account ID.
    ///
    /// Compares the identifier value, never object identity.
    pub fn is(&self, account_id: i64) -> bool {
        self.id == account_id
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login email.
    pub email: String,
    /// Display name.
    pub nickname: String,
    /// Password hash (must already be hashed).
    pub password: String,
}

impl NewAccount {
    /// Create a new account record.
    pub fn new(
        email: impl Into<String>,
        nickname: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            nickname: nickname.into(),
            password: password_hash.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64) -> Account {
        Account {
            id,
            email: format!("user{id}@sungshin.ac.kr"),
            nickname: format!("user{id}"),
            password: "hash".to_string(),
            registered_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_is_compares_id_value() {
        let a = account(1);
        let copy = a.clone();
        assert!(a.is(copy.id));
        assert!(!a.is(2));
    }

    #[test]
    fn test_new_account() {
        let new_account = NewAccount::new("a@b.c", "nick", "$argon2id$...");
        assert_eq!(new_account.email, "a@b.c");
        assert_eq!(new_account.nickname, "nick");
        assert_eq!(new_account.password, "$argon2id$...");
    }
}
