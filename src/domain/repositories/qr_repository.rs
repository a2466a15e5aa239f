//! Repository trait for QR record data access.

use crate::domain::entities::{AppearancePatch, NewQrRecord, QrRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of an insert attempt that is subject to content deduplication.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// A new record (and its short link, if dynamic) was committed.
    Created(QrRecord),
    /// The owner already had a record with the same type and payload.
    Duplicate(QrRecord),
}

/// Repository interface for QR records and the short links they own.
///
/// Every mutating operation that touches both a record and its short link
/// runs in a single transaction.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgQrRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_qr.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QrRepository: Send + Sync {
    /// Inserts a record, plus its short link when `new.short_code` is set.
    ///
    /// Serializes concurrent inserts with the same `(user_id, kind, is_dynamic, payload)`
    /// and re-checks for a duplicate inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when a generated id or short code
    /// collides; the constraint name is in the error details.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new: NewQrRecord) -> Result<InsertOutcome, AppError>;

    /// Finds a record of `owner` with the same kind, dynamism and payload.
    ///
    /// For dynamic records the destination is the payload that was submitted,
    /// so `original_url` is matched as well as `data`. Static and dynamic
    /// records never match each other.
    async fn find_by_content(
        &self,
        owner: i64,
        kind: &str,
        data: &str,
        is_dynamic: bool,
    ) -> Result<Option<QrRecord>, AppError>;

    /// Finds a record by id, only if it belongs to `owner`.
    async fn find_owned(&self, owner: i64, id: &str) -> Result<Option<QrRecord>, AppError>;

    /// Lists all records of `owner`, newest first.
    async fn list_by_owner(&self, owner: i64) -> Result<Vec<QrRecord>, AppError>;

    /// Sets the destination of a dynamic record and its short link together.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` with the updated record
    /// - `Ok(None)` if the record or its short link is missing
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors; nothing is written.
    async fn set_destination(
        &self,
        owner: i64,
        id: &str,
        destination: &str,
    ) -> Result<Option<QrRecord>, AppError>;

    /// Applies an allowlisted appearance patch. `None` fields are unchanged.
    ///
    /// Returns `Ok(None)` if no record matches `owner` + `id`.
    async fn update_appearance(
        &self,
        owner: i64,
        id: &str,
        patch: AppearancePatch,
    ) -> Result<Option<QrRecord>, AppError>;

    /// Deletes a record, removing its short link first.
    ///
    /// Returns `Ok(true)` if the record was found and deleted. Scan logs
    /// cascade with the record.
    async fn delete_owned(&self, owner: i64, id: &str) -> Result<bool, AppError>;
}
