//! API route configuration.
//!
//! Protected routes require a Bearer access token via
//! [`crate::api::middleware::auth`]; the caller is available to handlers as
//! [`crate::api::middleware::Principal`].

use crate::api::handlers::{
    create_qr_code_handler, delete_qr_code_handler, get_qr_code_handler, list_qr_codes_handler,
    login_handler, logout_handler, me_handler, refresh_handler, register_handler,
    scan_logs_handler, update_qr_code_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Routes reachable without a token.
///
/// # Endpoints
///
/// - `POST /register` - Create an account
/// - `POST /login`    - Obtain access and refresh tokens
/// - `POST /refresh`  - Exchange a refresh token for a new access token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
}

/// Routes requiring Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /logout`                   - Revoke the caller's refresh tokens
/// - `GET    /me`                       - Caller profile
/// - `GET    /qr-codes`                 - List the caller's QR codes
/// - `POST   /qr-codes`                 - Create a QR code (static or dynamic)
/// - `GET    /qr-codes/{id}`            - Fetch one QR code
/// - `PUT    /qr-codes/{id}`            - Update appearance (and static data)
/// - `DELETE /qr-codes/{id}`            - Delete a QR code with its short link
/// - `PUT    /qr-codes/{id}/update-url` - Change a dynamic code's destination
/// - `GET    /qr-codes/{id}/scan-logs`  - Paginated scan history
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler))
        .route(
            "/qr-codes",
            get(list_qr_codes_handler).post(create_qr_code_handler),
        )
        .route(
            "/qr-codes/{id}",
            get(get_qr_code_handler)
                .put(update_qr_code_handler)
                .delete(delete_qr_code_handler),
        )
        .route("/qr-codes/{id}/update-url", put(update_url_handler))
        .route("/qr-codes/{id}/scan-logs", get(scan_logs_handler))
}
