//! QR record management: creation, destination and appearance updates, deletion.

use std::sync::Arc;

use crate::domain::entities::qr_record::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_COLOR, DEFAULT_SIZE, KIND_URL, SIZE_RANGE,
};
use crate::domain::entities::{AppearancePatch, NewQrRecord, QrRecord};
use crate::domain::repositories::{InsertOutcome, QrRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_record_id, generate_short_code};
use crate::utils::timestamp::parse_timestamp;
use crate::utils::url_validator::validate_destination_url;
use serde_json::json;

/// Maximum length of the `type` tag.
pub const MAX_KIND_LENGTH: usize = 20;
/// Maximum length of a payload at creation.
pub const MAX_DATA_LENGTH: usize = 4096;
/// Maximum length of a payload set through an appearance update.
pub const MAX_UPDATED_DATA_LENGTH: usize = 2000;
/// Maximum length of a color string.
pub const MAX_COLOR_LENGTH: usize = 7;
/// Maximum length of the free-form validity label.
pub const MAX_VALIDITY_LENGTH: usize = 20;

const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Constraints whose violation means a generated id or code collided.
const COLLISION_CONSTRAINTS: &[&str] = &[
    "qr_codes_pkey",
    "short_links_pkey",
    "qr_codes_short_code_key",
];

/// Input for [`QrService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateQrCode {
    pub kind: String,
    pub data: String,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub size: Option<i64>,
    pub is_dynamic: bool,
    pub expires_at: Option<String>,
    pub validity_duration: Option<String>,
}

/// Input for [`QrService::update_appearance`]. Only these fields can change.
#[derive(Debug, Clone, Default)]
pub struct AppearanceUpdate {
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub size: Option<i64>,
    pub data: Option<String>,
}

/// Result of a create call.
///
/// `created == false` means an identical record already existed and is
/// returned instead. This is not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOutcome {
    pub record: QrRecord,
    pub created: bool,
}

/// Service owning the lifecycle of QR records and their short links.
///
/// Generation collisions are detected through uniqueness constraints at
/// insert time and retried with fresh candidates, so concurrent creators can
/// never both win the same id or short code.
pub struct QrService<R: QrRepository> {
    repository: Arc<R>,
    base_url: String,
}

impl<R: QrRepository> QrService<R> {
    /// Creates a new QR service.
    ///
    /// `base_url` is the public origin used to build short links; trailing
    /// slashes are ignored.
    pub fn new(repository: Arc<R>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the public short-link URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/go/{}", self.base_url, code)
    }

    /// Creates a record, or returns the owner's identical existing record.
    ///
    /// A record is dynamic only when `is_dynamic` is requested and the type
    /// is `url`; its `data` then becomes the short-link URL and the submitted
    /// payload becomes the destination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `type` or `data` is empty or too long
    /// - `expires_at` is missing or unparseable
    /// - a dynamic destination is not an absolute http(s) URL
    ///
    /// Returns [`AppError::Internal`] if no unique id/code could be generated
    /// or on database errors.
    pub async fn create(&self, owner: i64, input: CreateQrCode) -> Result<CreateOutcome, AppError> {
        let kind = input.kind.trim().to_string();
        if kind.is_empty() || kind.chars().count() > MAX_KIND_LENGTH {
            return Err(AppError::bad_request(
                "Invalid QR code type",
                json!({ "field": "type", "max_length": MAX_KIND_LENGTH }),
            ));
        }

        if input.data.trim().is_empty() || input.data.chars().count() > MAX_DATA_LENGTH {
            return Err(AppError::bad_request(
                "Invalid QR code data",
                json!({ "field": "data", "max_length": MAX_DATA_LENGTH }),
            ));
        }
        let data = input.data.trim().to_string();

        let expires_at = match input.expires_at.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(AppError::bad_request(
                    "Expiration date is required",
                    json!({ "field": "expires_at" }),
                ));
            }
            Some(raw) => parse_timestamp(raw).ok_or_else(|| {
                AppError::bad_request(
                    "Invalid expiration date format",
                    json!({ "field": "expires_at", "value": raw }),
                )
            })?,
        };

        let validity_duration = input
            .validity_duration
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && v.chars().count() <= MAX_VALIDITY_LENGTH);

        let is_dynamic = input.is_dynamic && kind == KIND_URL;
        if input.is_dynamic && !is_dynamic {
            tracing::debug!(kind = %kind, "Dynamic requested for non-url type; creating static");
        }

        let destination = if is_dynamic {
            Some(validate_destination_url(&data).map_err(|e| {
                AppError::bad_request(
                    "Invalid destination URL",
                    json!({ "field": "data", "reason": e.to_string() }),
                )
            })?)
        } else {
            None
        };

        let payload = destination.as_deref().unwrap_or(&data);
        if let Some(existing) = self
            .repository
            .find_by_content(owner, &kind, payload, is_dynamic)
            .await?
        {
            tracing::debug!(qr_code_id = %existing.id, "Returning existing QR code");
            return Ok(CreateOutcome {
                record: existing,
                created: false,
            });
        }

        let color = sanitize_color(input.color).unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let background_color = sanitize_color(input.background_color)
            .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string());
        let size = sanitize_size(input.size).unwrap_or(DEFAULT_SIZE);

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let (short_code, short_url) = if is_dynamic {
                let code = generate_short_code();
                let url = self.short_url(&code);
                (Some(code), Some(url))
            } else {
                (None, None)
            };

            let new = NewQrRecord {
                id: generate_record_id(),
                user_id: owner,
                kind: kind.clone(),
                data: short_url.clone().unwrap_or_else(|| data.clone()),
                original_url: destination.clone(),
                color: color.clone(),
                background_color: background_color.clone(),
                size,
                short_code,
                short_url,
                expires_at,
                validity_duration: validity_duration.clone(),
            };

            match self.repository.insert(new).await {
                Ok(InsertOutcome::Created(record)) => {
                    tracing::info!(
                        qr_code_id = %record.id,
                        owner,
                        is_dynamic = record.is_dynamic,
                        "QR code created"
                    );
                    return Ok(CreateOutcome {
                        record,
                        created: true,
                    });
                }
                Ok(InsertOutcome::Duplicate(record)) => {
                    return Ok(CreateOutcome {
                        record,
                        created: false,
                    });
                }
                Err(e) if is_generation_collision(&e) => {
                    tracing::warn!(attempt, error = %e, "Generated identifier collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique identifiers",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Lists the owner's records, newest first.
    pub async fn list(&self, owner: i64) -> Result<Vec<QrRecord>, AppError> {
        self.repository.list_by_owner(owner).await
    }

    /// Fetches one of the owner's records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record does not exist or belongs
    /// to someone else; the two cases are indistinguishable.
    pub async fn get(&self, owner: i64, id: &str) -> Result<QrRecord, AppError> {
        self.repository
            .find_owned(owner, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Changes where a dynamic record's short link redirects.
    ///
    /// The short link and the record's `original_url` are updated together;
    /// `data` keeps the short-link URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record is not the owner's, or if
    /// its short link is missing.
    /// Returns [`AppError::InvalidOperation`] if the record is static.
    /// Returns [`AppError::Validation`] if `new_url` is not an http(s) URL.
    pub async fn update_destination(
        &self,
        owner: i64,
        id: &str,
        new_url: &str,
    ) -> Result<QrRecord, AppError> {
        let record = self.get(owner, id).await?;

        if !record.is_dynamic {
            return Err(AppError::invalid_operation(
                "Only dynamic QR codes can change destination",
                json!({ "id": id }),
            ));
        }

        let destination = validate_destination_url(new_url).map_err(|e| {
            AppError::bad_request(
                "Invalid destination URL",
                json!({ "field": "new_url", "reason": e.to_string() }),
            )
        })?;

        let updated = self
            .repository
            .set_destination(owner, id, &destination)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "id": id }))
            })?;

        tracing::info!(qr_code_id = %id, "QR code destination updated");

        Ok(updated)
    }

    /// Applies an appearance update.
    ///
    /// - `color`, `background_color`: ignored unless 1 to 7 characters
    /// - `size`: ignored unless within 100..=1000
    /// - `data`: ignored for dynamic records; must be 1 to 2000 characters otherwise
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record is not the owner's.
    /// Returns [`AppError::Validation`] for an empty or oversized static `data`.
    pub async fn update_appearance(
        &self,
        owner: i64,
        id: &str,
        update: AppearanceUpdate,
    ) -> Result<QrRecord, AppError> {
        let record = self.get(owner, id).await?;

        let data = match update.data {
            Some(_) if record.is_dynamic => None,
            Some(data) => {
                let trimmed = data.trim();
                if trimmed.is_empty() || data.chars().count() > MAX_UPDATED_DATA_LENGTH {
                    return Err(AppError::bad_request(
                        "Invalid QR code data",
                        json!({ "field": "data", "max_length": MAX_UPDATED_DATA_LENGTH }),
                    ));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let patch = AppearancePatch {
            color: sanitize_color(update.color),
            background_color: sanitize_color(update.background_color),
            size: sanitize_size(update.size),
            data,
        };

        self.repository
            .update_appearance(owner, id, patch)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Deletes a record together with its short link and scan logs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record is not the owner's.
    pub async fn delete(&self, owner: i64, id: &str) -> Result<(), AppError> {
        if !self.repository.delete_owned(owner, id).await? {
            return Err(not_found(id));
        }

        tracing::info!(qr_code_id = %id, owner, "QR code deleted");

        Ok(())
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found("QR code not found", json!({ "id": id }))
}

fn is_generation_collision(error: &AppError) -> bool {
    COLLISION_CONSTRAINTS
        .iter()
        .any(|constraint| error.is_conflict_on(constraint))
}

fn sanitize_color(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v.chars().count() <= MAX_COLOR_LENGTH)
}

fn sanitize_size(value: Option<i64>) -> Option<i32> {
    value
        .and_then(|v| i32::try_from(v).ok())
        .filter(|v| SIZE_RANGE.contains(v))
}
