//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticated user id, inserted into request extensions by [`layer`].
///
/// Handlers behind the middleware take it with
/// `Extension(Principal(user_id)): Extension<Principal>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal(pub i64);

/// Resolves the `Authorization: Bearer <access token>` header to a
/// [`Principal`].
///
/// The token is a JWT issued by `POST /login` or `POST /refresh`; it is
/// validated locally, no database round trip is made.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header
/// is missing or malformed, or the token is invalid or expired.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/qr-codes", get(list_qr_codes_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user_id = st.auth_service.current_principal(&token)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(Principal(user_id));

    Ok(next.run(req).await)
}
