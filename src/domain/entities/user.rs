//! User account entity.

use chrono::{DateTime, Utc};

/// A registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub email_verified: bool,
    pub failed_login_attempts: i32,
    pub account_locked_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Returns true while a failed-login lockout is in effect.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.account_locked_until.is_some_and(|until| until > now)
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now())
    }
}

/// Input data for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub email_verified: bool,
}

/// A stored refresh token. Only its keyed hash is persisted.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Input data for storing a refresh token.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: i64,
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(locked_until: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: 1,
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            email_verified: true,
            failed_login_attempts: 0,
            account_locked_until: locked_until,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    #[test]
    fn test_not_locked_without_timestamp() {
        assert!(!user(None).is_locked());
    }

    #[test]
    fn test_locked_until_future() {
        assert!(user(Some(Utc::now() + Duration::minutes(15))).is_locked());
    }

    #[test]
    fn test_lock_expires() {
        assert!(!user(Some(Utc::now() - Duration::seconds(1))).is_locked());
    }
}
