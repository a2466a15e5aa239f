//! Handler for scan log listing.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::pagination::PageParams;
use crate::api::dto::scan_logs::ScanLogsResponse;
use crate::api::extract::ApiQuery;
use crate::api::middleware::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Lists scan logs of one of the caller's QR codes, newest first.
///
/// # Endpoint
///
/// `GET /qr-codes/{id}/scan-logs?page=1&per_page=50`
///
/// # Query Parameters
///
/// - `page` - 1-based page number (default 1)
/// - `per_page` - page size (default 50, capped at 100)
///
/// # Errors
///
/// Returns 404 Not Found if the record is missing or not the caller's.
/// Returns 400 Bad Request if `page` or `per_page` is below 1.
pub async fn scan_logs_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<ScanLogsResponse>, AppError> {
    let page = state
        .scan_service
        .list_scan_logs(user_id, &id, params.page, params.per_page)
        .await?;

    Ok(Json(page.into()))
}
