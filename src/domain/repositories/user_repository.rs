//! Repository traits for accounts and refresh tokens.

use crate::domain::entities::{NewRefreshToken, NewUser, RefreshToken, User};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Increments the failed-login counter.
    ///
    /// When the counter reaches `max_attempts` the account is locked until
    /// `lock_until`. The update is a single statement, so concurrent failures
    /// are all counted.
    async fn record_failed_login(
        &self,
        id: i64,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
    ) -> Result<User, AppError>;

    /// Clears the failure counter and lock, and stamps `last_login`.
    async fn record_successful_login(&self, id: i64) -> Result<(), AppError>;

    /// Clears a lockout by email. Returns `Ok(false)` if no such account.
    async fn unlock(&self, email: &str) -> Result<bool, AppError>;

    /// Lists all accounts, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

/// Repository interface for refresh tokens.
///
/// Tokens are stored as keyed hashes. Raw tokens are never persisted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken, AppError>;

    /// Finds a token by hash that is neither revoked nor expired.
    async fn find_active(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError>;

    /// Updates the `last_used_at` timestamp.
    async fn touch(&self, id: i64) -> Result<(), AppError>;

    /// Revokes every active token of a user. Returns the number revoked.
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, AppError>;
}
