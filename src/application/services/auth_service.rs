//! Account registration, login with lockout, and token lifecycle.

use chrono::{Duration, Utc};
use std::sync::Arc;
use validator::ValidateEmail;

use crate::application::services::JwtService;
use crate::domain::entities::{NewRefreshToken, NewUser, User};
use crate::domain::repositories::{RefreshTokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::tokens::{TokenHasher, generate_refresh_token};
use serde_json::json;

/// Maximum length of an email address.
pub const MAX_EMAIL_LENGTH: usize = 120;
/// Minimum length of a password.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Consecutive failed logins that trigger a lockout.
pub const MAX_FAILED_LOGINS: i32 = 5;
/// Lockout duration in minutes.
pub const LOCKOUT_MINUTES: i64 = 15;

/// Client metadata stored alongside a refresh token.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Tokens issued on login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Service for the identity store: accounts, credentials and tokens.
///
/// Access tokens are stateless JWTs. Refresh tokens are opaque random
/// strings; only their HMAC-SHA256 (keyed by `signing_secret`) is stored, so
/// an attacker with read-only database access cannot use them.
pub struct AuthService<U: UserRepository, T: RefreshTokenRepository> {
    users: Arc<U>,
    tokens: Arc<T>,
    jwt: JwtService,
    hasher: TokenHasher,
    refresh_token_ttl: Duration,
}

impl<U: UserRepository, T: RefreshTokenRepository> AuthService<U, T> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `jwt` - issuer/validator for access tokens
    /// - `signing_secret` - HMAC key for refresh tokens
    /// - `refresh_token_days` - refresh token lifetime
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        jwt: JwtService,
        signing_secret: impl Into<String>,
        refresh_token_days: i64,
    ) -> Self {
        Self {
            users,
            tokens,
            jwt,
            hasher: TokenHasher::new(signing_secret),
            refresh_token_ttl: Duration::days(refresh_token_days),
        }
    }

    /// Registers a new account. Accounts are created verified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed email or short password.
    /// Returns [`AppError::Conflict`] if the email is taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim();

        if email.is_empty() || email.chars().count() > MAX_EMAIL_LENGTH || !email.validate_email() {
            return Err(AppError::bad_request(
                "Invalid email format",
                json!({ "field": "email" }),
            ));
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::bad_request(
                "Password must be at least 8 characters",
                json!({ "field": "password", "min_length": MIN_PASSWORD_LENGTH }),
            ));
        }

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Internal server error", json!({}))
        })?;

        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                email_verified: true,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// Verifies credentials and returns the principal id.
    ///
    /// A wrong password counts toward the lockout; the fifth consecutive
    /// failure locks the account for 15 minutes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email, a wrong
    /// password, or an inactive account (indistinguishable to the caller).
    /// Returns [`AppError::Locked`] while a lockout is in effect.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            return Err(invalid_credentials());
        };

        if !user.is_active {
            return Err(invalid_credentials());
        }

        if user.is_locked() {
            return Err(AppError::locked(
                "Account temporarily locked",
                json!({ "locked_until": user.account_locked_until }),
            ));
        }

        let matches = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "Stored password hash is unusable");
            AppError::internal("Internal server error", json!({}))
        })?;

        if !matches {
            let lock_until = Utc::now() + Duration::minutes(LOCKOUT_MINUTES);
            let updated = self
                .users
                .record_failed_login(user.id, MAX_FAILED_LOGINS, lock_until)
                .await?;

            if updated.is_locked() {
                tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
            }

            return Err(invalid_credentials());
        }

        self.users.record_successful_login(user.id).await?;

        Ok(user)
    }

    /// Authenticates and issues an access/refresh token pair.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        context: LoginContext,
    ) -> Result<(User, TokenPair), AppError> {
        let user = self.authenticate(email, password).await?;

        let access_token = self.access_token_for(user.id)?;
        let refresh_token = generate_refresh_token().map_err(|e| {
            tracing::error!(error = %e, "Random generator failed");
            AppError::internal("Internal server error", json!({}))
        })?;

        self.tokens
            .create(NewRefreshToken {
                user_id: user.id,
                token_hash: self.hasher.hash(&refresh_token),
                ip_address: context.ip_address,
                user_agent: context.user_agent,
                expires_at: Utc::now() + self.refresh_token_ttl,
            })
            .await?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok((
            user,
            TokenPair {
                access_token,
                refresh_token,
                expires_in: self.jwt.access_token_ttl_seconds(),
            },
        ))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, revoked or expired.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let stored = self
            .tokens
            .find_active(&self.hasher.hash(refresh_token))
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or revoked refresh token" }),
                )
            })?;

        let _ = self.tokens.touch(stored.id).await;

        self.access_token_for(stored.user_id)
    }

    /// Revokes every refresh token of the principal.
    pub async fn logout(&self, user_id: i64) -> Result<u64, AppError> {
        let revoked = self.tokens.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id, revoked, "User logged out");
        Ok(revoked)
    }

    /// Resolves a bearer access token to the principal id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid or expired.
    pub fn current_principal(&self, token: &str) -> Result<i64, AppError> {
        self.jwt.validate_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid or expired access token" }),
            )
        })
    }

    /// Returns the principal's profile.
    pub async fn me(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": user_id })))
    }

    /// Issues an access token for `user_id`.
    pub fn access_token_for(&self, user_id: i64) -> Result<String, AppError> {
        self.jwt.generate_access_token(user_id).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            AppError::internal("Internal server error", json!({}))
        })
    }

    /// Lifetime of issued access tokens, in seconds.
    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.jwt.access_token_ttl_seconds()
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RefreshToken;
    use crate::domain::repositories::{MockRefreshTokenRepository, MockUserRepository};

    const JWT_SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn service(
        users: MockUserRepository,
        tokens: MockRefreshTokenRepository,
    ) -> AuthService<MockUserRepository, MockRefreshTokenRepository> {
        AuthService::new(
            Arc::new(users),
            Arc::new(tokens),
            JwtService::new(JWT_SECRET, 900),
            test_secret(),
            30,
        )
    }

    fn user(password: &str, failed: i32) -> User {
        let now = Utc::now();
        User {
            id: 7,
            email: "alice@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            email_verified: true,
            failed_login_attempts: failed,
            account_locked_until: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let svc = service(MockUserRepository::new(), MockRefreshTokenRepository::new());

        assert!(matches!(
            svc.register("not-an-email", "longenough").await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            svc.register("alice@example.com", "short").await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|new| {
                new.email == "alice@example.com"
                    && new.password_hash.starts_with("$argon2")
                    && new.email_verified
            })
            .times(1)
            .returning(|new| {
                let mut u = user("irrelevant", 0);
                u.email = new.email;
                Ok(u)
            });

        let svc = service(users, MockRefreshTokenRepository::new());
        let created = svc
            .register("  alice@example.com ", "correct horse")
            .await
            .unwrap();

        assert_eq!(created.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_login_success_issues_tokens() {
        let mut users = MockUserRepository::new();
        let stored = user("correct horse", 2);
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        users
            .expect_record_successful_login()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(()));

        let mut tokens = MockRefreshTokenRepository::new();
        tokens
            .expect_create()
            .withf(|t| t.user_id == 7 && t.token_hash.len() == 64)
            .times(1)
            .returning(|t| {
                Ok(RefreshToken {
                    id: 1,
                    user_id: t.user_id,
                    token_hash: t.token_hash,
                    created_at: Utc::now(),
                    expires_at: t.expires_at,
                    revoked_at: None,
                })
            });

        let svc = service(users, tokens);
        let (_, pair) = svc
            .login("alice@example.com", "correct horse", LoginContext::default())
            .await
            .unwrap();

        assert_eq!(svc.current_principal(&pair.access_token).unwrap(), 7);
        assert_eq!(pair.expires_in, 900);
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_counts_failure() {
        let mut users = MockUserRepository::new();
        let stored = user("correct horse", 0);
        let after = {
            let mut u = stored.clone();
            u.failed_login_attempts = 1;
            u
        };
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        users
            .expect_record_failed_login()
            .withf(|id, max, _| *id == 7 && *max == MAX_FAILED_LOGINS)
            .times(1)
            .returning(move |_, _, _| Ok(after.clone()));
        users.expect_record_successful_login().times(0);

        let svc = service(users, MockRefreshTokenRepository::new());

        assert!(matches!(
            svc.authenticate("alice@example.com", "wrong password").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_locked_account_rejected_before_password_check() {
        let mut users = MockUserRepository::new();
        let mut stored = user("correct horse", 5);
        stored.account_locked_until = Some(Utc::now() + Duration::minutes(10));
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        users.expect_record_failed_login().times(0);
        users.expect_record_successful_login().times(0);

        let svc = service(users, MockRefreshTokenRepository::new());

        assert!(matches!(
            svc.authenticate("alice@example.com", "correct horse").await,
            Err(AppError::Locked { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let svc = service(users, MockRefreshTokenRepository::new());

        assert!(matches!(
            svc.authenticate("ghost@example.com", "whatever1").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_inactive_account_unauthorized() {
        let mut users = MockUserRepository::new();
        let mut stored = user("correct horse", 0);
        stored.is_active = false;
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let svc = service(users, MockRefreshTokenRepository::new());

        assert!(matches!(
            svc.authenticate("alice@example.com", "correct horse").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_refresh_uses_keyed_hash() {
        let expected = TokenHasher::new(test_secret()).hash("raw-refresh-token");

        let mut tokens = MockRefreshTokenRepository::new();
        tokens
            .expect_find_active()
            .withf(move |hash| hash == expected)
            .times(1)
            .returning(|hash| {
                Ok(Some(RefreshToken {
                    id: 3,
                    user_id: 7,
                    token_hash: hash.to_string(),
                    created_at: Utc::now(),
                    expires_at: Utc::now() + Duration::days(1),
                    revoked_at: None,
                }))
            });
        tokens.expect_touch().returning(|_| Ok(()));

        let svc = service(MockUserRepository::new(), tokens);
        let access = svc.refresh("raw-refresh-token").await.unwrap();

        assert_eq!(svc.current_principal(&access).unwrap(), 7);
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_find_active().returning(|_| Ok(None));

        let svc = service(MockUserRepository::new(), tokens);

        assert!(matches!(
            svc.refresh("revoked").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_all() {
        let mut tokens = MockRefreshTokenRepository::new();
        tokens
            .expect_revoke_all_for_user()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(3));

        let svc = service(MockUserRepository::new(), tokens);

        assert_eq!(svc.logout(7).await.unwrap(), 3);
    }

    #[test]
    fn test_current_principal_rejects_garbage() {
        let svc = service(MockUserRepository::new(), MockRefreshTokenRepository::new());

        assert!(matches!(
            svc.current_principal("garbage"),
            Err(AppError::Unauthorized { .. })
        ));
    }
}
