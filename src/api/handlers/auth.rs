//! Handlers for account registration and session management.

use axum::{
    Extension, Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode, header},
};
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, LoginResponse, LogoutResponse, MeResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse,
};
use crate::api::extract::ApiJson;
use crate::api::middleware::Principal;
use crate::application::services::LoginContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_ip, header_string};

const TOKEN_TYPE: &str = "Bearer";

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "password": "at least 8 chars" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed email or a short password.
/// Returns 409 Conflict if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created",
            user_id: user.id,
        }),
    ))
}

/// Authenticates and issues an access/refresh token pair.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Response
///
/// ```json
/// {
///   "message": "Logged in",
///   "access_token": "eyJ...",
///   "refresh_token": "q8N...",
///   "token_type": "Bearer",
///   "expires_in": 900,
///   "user": { "id": 1, "email": "user@example.com", ... }
/// }
/// ```
///
/// # Errors
///
/// Returns 401 Unauthorized for unknown email or wrong password.
/// Returns 423 Locked while the account is locked after repeated failures.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let context = LoginContext {
        ip_address: client_ip(&headers, Some(addr), state.behind_proxy),
        user_agent: header_string(&headers, header::USER_AGENT),
    };

    let (user, tokens) = state
        .auth_service
        .login(&payload.email, &payload.password, context)
        .await?;

    Ok(Json(LoginResponse {
        message: "Logged in",
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: TOKEN_TYPE,
        expires_in: tokens.expires_in,
        user: user.into(),
    }))
}

/// Exchanges a refresh token for a new access token.
///
/// # Endpoint
///
/// `POST /refresh`
///
/// # Errors
///
/// Returns 401 Unauthorized if the refresh token is unknown, revoked or expired.
pub async fn refresh_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    payload.validate()?;

    let access_token = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: TOKEN_TYPE,
        expires_in: state.auth_service.access_token_ttl_seconds(),
    }))
}

/// Revokes every refresh token of the caller.
///
/// Access tokens already issued stay valid until they expire.
///
/// # Endpoint
///
/// `POST /logout` (authenticated)
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
) -> Result<Json<LogoutResponse>, AppError> {
    let revoked_tokens = state.auth_service.logout(user_id).await?;

    Ok(Json(LogoutResponse {
        message: "Logged out",
        revoked_tokens,
    }))
}

/// Returns the caller's profile.
///
/// # Endpoint
///
/// `GET /me` (authenticated)
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state.auth_service.me(user_id).await?;

    Ok(Json(MeResponse { user: user.into() }))
}
