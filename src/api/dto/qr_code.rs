//! DTOs for QR code endpoints.
//!
//! Request fields default to empty so that a missing field is reported by
//! the service as a validation error rather than a deserialization failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::services::{AppearanceUpdate, CreateQrCode};
use crate::domain::entities::QrRecord;

/// Request body for `POST /qr-codes`.
///
/// `size` is taken as raw JSON: anything that is not an integer is ignored
/// and the default size is used.
#[derive(Debug, Default, Deserialize)]
pub struct CreateQrCodeRequest {
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default, rename = "backgroundColor", alias = "background_color")]
    pub background_color: Option<String>,

    #[serde(default)]
    pub size: Option<Value>,

    #[serde(default, rename = "isDynamic", alias = "is_dynamic")]
    pub is_dynamic: bool,

    #[serde(default, rename = "expiresAt", alias = "expires_at")]
    pub expires_at: Option<String>,

    #[serde(default, rename = "validityDuration", alias = "validity_duration")]
    pub validity_duration: Option<String>,
}

impl From<CreateQrCodeRequest> for CreateQrCode {
    fn from(req: CreateQrCodeRequest) -> Self {
        Self {
            kind: req.kind,
            data: req.data,
            color: req.color,
            background_color: req.background_color,
            size: req.size.as_ref().and_then(Value::as_i64),
            is_dynamic: req.is_dynamic,
            expires_at: req.expires_at,
            validity_duration: req.validity_duration,
        }
    }
}

/// Request body for `PUT /qr-codes/{id}`. Only appearance fields and, for
/// static records, `data` are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQrCodeRequest {
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default, rename = "backgroundColor", alias = "background_color")]
    pub background_color: Option<String>,

    #[serde(default)]
    pub size: Option<Value>,

    #[serde(default)]
    pub data: Option<String>,
}

impl From<UpdateQrCodeRequest> for AppearanceUpdate {
    fn from(req: UpdateQrCodeRequest) -> Self {
        Self {
            color: req.color,
            background_color: req.background_color,
            size: req.size.as_ref().and_then(Value::as_i64),
            data: req.data,
        }
    }
}

/// Request body for `PUT /qr-codes/{id}/update-url`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUrlRequest {
    #[serde(default, rename = "newUrl", alias = "new_url")]
    pub new_url: String,
}

/// A QR record as returned by the API.
///
/// `is_active` is derived at serialization time from `status` and
/// `expires_at`.
#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub id: String,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
    pub original_url: Option<String>,
    pub color: String,
    pub background_color: String,
    pub size: i32,
    pub is_dynamic: bool,
    pub short_code: Option<String>,
    pub short_url: Option<String>,
    pub status: &'static str,
    pub is_active: bool,
    pub scans: i64,
    pub expires_at: DateTime<Utc>,
    pub validity_duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QrRecord> for QrCodeResponse {
    fn from(record: QrRecord) -> Self {
        let is_active = record.is_active();
        Self {
            id: record.id,
            user_id: record.user_id,
            kind: record.kind,
            data: record.data,
            original_url: record.original_url,
            color: record.color,
            background_color: record.background_color,
            size: record.size,
            is_dynamic: record.is_dynamic,
            short_code: record.short_code,
            short_url: record.short_url,
            status: record.status.as_str(),
            is_active,
            scans: record.scans,
            expires_at: record.expires_at,
            validity_duration: record.validity_duration,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response for `POST /qr-codes`.
///
/// A new record is returned flat with `exists: false` (201); an identical
/// existing record is nested under `existing` with `exists: true` (200).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateQrCodeResponse {
    Created {
        #[serde(flatten)]
        qr_code: QrCodeResponse,
        exists: bool,
        message: &'static str,
    },
    Existing {
        exists: bool,
        existing: QrCodeResponse,
        message: &'static str,
    },
}

impl CreateQrCodeResponse {
    pub fn created(record: QrRecord) -> Self {
        Self::Created {
            qr_code: record.into(),
            exists: false,
            message: "QR code created",
        }
    }

    pub fn existing(record: QrRecord) -> Self {
        Self::Existing {
            exists: true,
            existing: record.into(),
            message: "A QR code with this content already exists",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateUrlResponse {
    pub success: bool,
    pub message: &'static str,
    pub new_url: String,
    pub short_url: Option<String>,
    pub qr_code: QrCodeResponse,
}

#[derive(Debug, Serialize)]
pub struct UpdateQrCodeResponse {
    pub success: bool,
    pub message: &'static str,
    pub qr_code: QrCodeResponse,
}

#[derive(Debug, Serialize)]
pub struct DeleteQrCodeResponse {
    pub message: &'static str,
}
