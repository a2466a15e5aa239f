//! Handler for short link redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::application::services::ScanContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_ip, header_string};

/// Redirects a short code to its current destination.
///
/// # Endpoint
///
/// `GET /go/{code}` (public)
///
/// # Request Flow
///
/// 1. Collect client IP, `User-Agent` and `Referer`
/// 2. In one transaction: bump the link's clicks, the record's scans and
///    append a scan log
/// 3. Return `302 Found` to the destination read in that transaction
///
/// The destination is never cached; changing it through
/// `PUT /qr-codes/{id}/update-url` takes effect on the next scan.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or its link inactive.
/// Returns 500 if the visit could not be recorded; no counter moves in that case.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let context = ScanContext {
        ip_address: client_ip(&headers, Some(addr), state.behind_proxy),
        user_agent: header_string(&headers, header::USER_AGENT),
        referer: header_string(&headers, header::REFERER),
    };

    let visit = state.redirect_service.resolve(&code, context).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, visit.destination)]))
}
