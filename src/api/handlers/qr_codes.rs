//! Handlers for QR code management.
//!
//! Every handler runs behind [`crate::api::middleware::auth`] and acts on
//! behalf of the authenticated [`Principal`]. Records owned by other users
//! are reported as 404, exactly like missing ones.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::qr_code::{
    CreateQrCodeRequest, CreateQrCodeResponse, DeleteQrCodeResponse, QrCodeResponse,
    UpdateQrCodeRequest, UpdateQrCodeResponse, UpdateUrlRequest, UpdateUrlResponse,
};
use crate::api::extract::ApiJson;
use crate::api::middleware::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a QR code, or returns the caller's identical existing one.
///
/// # Endpoint
///
/// `POST /qr-codes`
///
/// # Request Body
///
/// ```json
/// {
///   "type": "url",
///   "data": "https://example.com/menu",
///   "isDynamic": true,
///   "expiresAt": "2030-01-01T00:00:00Z",
///   "color": "#000000",
///   "backgroundColor": "#ffffff",
///   "size": 256,
///   "validityDuration": "1y"
/// }
/// ```
///
/// For a dynamic `url` code the response `data` is the short link
/// (`{BASE_URL}/go/{short_code}`) and `original_url` the destination.
///
/// # Response Codes
///
/// - **201 Created**: new record, `exists: false`
/// - **200 OK**: identical record already existed, returned under `existing`
///
/// # Errors
///
/// Returns 400 Bad Request for missing/oversized `type` or `data`, a missing
/// or unparseable `expiresAt`, or a dynamic destination that is not http(s).
pub async fn create_qr_code_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
    ApiJson(payload): ApiJson<CreateQrCodeRequest>,
) -> Result<(StatusCode, Json<CreateQrCodeResponse>), AppError> {
    let outcome = state.qr_service.create(user_id, payload.into()).await?;

    if outcome.created {
        Ok((
            StatusCode::CREATED,
            Json(CreateQrCodeResponse::created(outcome.record)),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(CreateQrCodeResponse::existing(outcome.record)),
        ))
    }
}

/// Lists the caller's QR codes, newest first.
///
/// # Endpoint
///
/// `GET /qr-codes`
pub async fn list_qr_codes_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
) -> Result<Json<Vec<QrCodeResponse>>, AppError> {
    let records = state.qr_service.list(user_id).await?;

    Ok(Json(records.into_iter().map(QrCodeResponse::from).collect()))
}

/// Returns one of the caller's QR codes.
///
/// # Endpoint
///
/// `GET /qr-codes/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the record is missing or not the caller's.
pub async fn get_qr_code_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<QrCodeResponse>, AppError> {
    let record = state.qr_service.get(user_id, &id).await?;

    Ok(Json(record.into()))
}

/// Updates appearance fields of a QR code.
///
/// # Endpoint
///
/// `PUT /qr-codes/{id}`
///
/// # Request Body
///
/// All fields optional:
///
/// ```json
/// { "color": "#112233", "backgroundColor": "#fafafa", "size": 512, "data": "new text" }
/// ```
///
/// Colors longer than 7 characters and sizes outside 100..=1000 are ignored.
/// `data` is ignored for dynamic codes, whose payload is the short link.
///
/// # Errors
///
/// Returns 404 Not Found if the record is missing or not the caller's.
/// Returns 400 Bad Request if a static code's new `data` is empty or over 2000 characters.
pub async fn update_qr_code_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateQrCodeRequest>,
) -> Result<Json<UpdateQrCodeResponse>, AppError> {
    let record = state
        .qr_service
        .update_appearance(user_id, &id, payload.into())
        .await?;

    Ok(Json(UpdateQrCodeResponse {
        success: true,
        message: "QR code updated",
        qr_code: record.into(),
    }))
}

/// Changes where a dynamic QR code redirects.
///
/// # Endpoint
///
/// `PUT /qr-codes/{id}/update-url`
///
/// # Request Body
///
/// ```json
/// { "newUrl": "https://example.com/new-menu" }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the record is missing or not the caller's.
/// Returns 400 Bad Request if the code is static or `newUrl` is not an http(s) URL.
pub async fn update_url_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUrlRequest>,
) -> Result<Json<UpdateUrlResponse>, AppError> {
    let record = state
        .qr_service
        .update_destination(user_id, &id, &payload.new_url)
        .await?;

    Ok(Json(UpdateUrlResponse {
        success: true,
        message: "Destination updated",
        new_url: record.original_url.clone().unwrap_or_default(),
        short_url: record.short_url.clone(),
        qr_code: record.into(),
    }))
}

/// Deletes a QR code with its short link and scan history.
///
/// # Endpoint
///
/// `DELETE /qr-codes/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the record is missing or not the caller's.
pub async fn delete_qr_code_handler(
    State(state): State<AppState>,
    Extension(Principal(user_id)): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<DeleteQrCodeResponse>, AppError> {
    state.qr_service.delete(user_id, &id).await?;

    Ok(Json(DeleteQrCodeResponse {
        message: "QR code deleted",
    }))
}
