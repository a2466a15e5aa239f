//! Repository trait for short link resolution.

use crate::domain::entities::{ScanMetadata, ShortLink, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the redirect hot path.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Records one visit on an active short link.
    ///
    /// In a single transaction: increments `clicks`, increments the owning
    /// record's `scans`, and appends a scan log built from `scan`. The
    /// destination is read from the locked row.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Visit))` once everything has committed
    /// - `Ok(None)` if no active link has this code; nothing is written
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, or when the stored
    /// destination contains control characters, after rolling back.
    async fn record_visit(&self, code: &str, scan: ScanMetadata)
    -> Result<Option<Visit>, AppError>;

    /// Finds a short link by code regardless of its active flag.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;
}
