//! Repository trait for reading scan logs.

use crate::domain::entities::ScanLog;
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to the append-only scan log.
///
/// Scan logs are written only by [`super::ShortLinkRepository::record_visit`]
/// and removed only by cascade when their record is deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanLogRepository: Send + Sync {
    /// Lists scan logs for a record, newest first.
    ///
    /// # Arguments
    ///
    /// - `limit` - Maximum number of rows
    /// - `offset` - Number of rows to skip
    async fn list_for_record(
        &self,
        qr_code_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ScanLog>, AppError>;

    /// Counts scan logs for a record.
    async fn count_for_record(&self, qr_code_id: &str) -> Result<i64, AppError>;
}
