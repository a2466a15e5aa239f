//! Scan log listing.

use std::sync::Arc;

use crate::domain::entities::{QrRecord, ScanLog};
use crate::domain::repositories::{QrRepository, ScanLogRepository};
use crate::error::AppError;
use serde_json::json;

/// Default page size for scan log listings.
pub const DEFAULT_PER_PAGE: i64 = 50;
/// Server-side cap on page size, applied regardless of the requested value.
pub const MAX_PER_PAGE: i64 = 100;

/// One page of scan logs for a record.
#[derive(Debug, Clone)]
pub struct ScanLogPage {
    pub record: QrRecord,
    pub logs: Vec<ScanLog>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl ScanLogPage {
    pub fn pages(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Service for reading a record's scan history.
pub struct ScanService<Q: QrRepository, S: ScanLogRepository> {
    records: Arc<Q>,
    logs: Arc<S>,
}

impl<Q: QrRepository, S: ScanLogRepository> ScanService<Q, S> {
    /// Creates a new scan service.
    pub fn new(records: Arc<Q>, logs: Arc<S>) -> Self {
        Self { records, logs }
    }

    /// Lists scan logs for one of the owner's records, newest first.
    ///
    /// `per_page` defaults to 50 and is capped at 100.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` or `per_page` is below 1.
    /// Returns [`AppError::NotFound`] if the record is not the owner's.
    pub async fn list_scan_logs(
        &self,
        owner: i64,
        record_id: &str,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<ScanLogPage, AppError> {
        let page = page.unwrap_or(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page < 1 || per_page < 1 {
            return Err(AppError::bad_request(
                "page and per_page must be at least 1",
                json!({ "page": page, "per_page": per_page }),
            ));
        }
        let per_page = per_page.min(MAX_PER_PAGE);

        let record = self
            .records
            .find_owned(owner, record_id)
            .await?
            .ok_or_else(|| AppError::not_found("QR code not found", json!({ "id": record_id })))?;

        let offset = (page - 1).saturating_mul(per_page);
        let logs = self.logs.list_for_record(record_id, per_page, offset).await?;
        let total = self.logs.count_for_record(record_id).await?;

        Ok(ScanLogPage {
            record,
            logs,
            page,
            per_page,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::QrStatus;
    use crate::domain::repositories::{MockQrRepository, MockScanLogRepository};
    use chrono::{Duration, Utc};

    fn record() -> QrRecord {
        let now = Utc::now();
        QrRecord {
            id: "qr_1_abc".to_string(),
            user_id: 1,
            kind: "url".to_string(),
            data: "https://qr.example.com/go/Ab12Cd".to_string(),
            original_url: Some("https://a.example".to_string()),
            color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            size: 256,
            is_dynamic: true,
            short_code: Some("Ab12Cd".to_string()),
            short_url: Some("https://qr.example.com/go/Ab12Cd".to_string()),
            status: QrStatus::Active,
            scans: 7,
            expires_at: now + Duration::days(1),
            validity_duration: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn records_returning(rec: Option<QrRecord>) -> MockQrRepository {
        let mut repo = MockQrRepository::new();
        repo.expect_find_owned()
            .returning(move |_, _| Ok(rec.clone()));
        repo
    }

    #[tokio::test]
    async fn test_per_page_capped() {
        let mut logs = MockScanLogRepository::new();
        logs.expect_list_for_record()
            .withf(|_, limit, offset| *limit == MAX_PER_PAGE && *offset == 0)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        logs.expect_count_for_record().returning(|_| Ok(0));

        let service = ScanService::new(Arc::new(records_returning(Some(record()))), Arc::new(logs));
        let page = service
            .list_scan_logs(1, "qr_1_abc", Some(1), Some(1000))
            .await
            .unwrap();

        assert_eq!(page.per_page, 100);
    }

    #[tokio::test]
    async fn test_defaults_and_offset() {
        let mut logs = MockScanLogRepository::new();
        logs.expect_list_for_record()
            .withf(|_, limit, offset| *limit == DEFAULT_PER_PAGE && *offset == 0)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        logs.expect_count_for_record().returning(|_| Ok(120));

        let service = ScanService::new(Arc::new(records_returning(Some(record()))), Arc::new(logs));
        let page = service
            .list_scan_logs(1, "qr_1_abc", None, None)
            .await
            .unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.pages(), 3);
        assert!(page.has_next());
        assert!(!page.has_prev());
    }

    #[tokio::test]
    async fn test_later_page_offset() {
        let mut logs = MockScanLogRepository::new();
        logs.expect_list_for_record()
            .withf(|_, limit, offset| *limit == 10 && *offset == 20)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        logs.expect_count_for_record().returning(|_| Ok(25));

        let service = ScanService::new(Arc::new(records_returning(Some(record()))), Arc::new(logs));
        let page = service
            .list_scan_logs(1, "qr_1_abc", Some(3), Some(10))
            .await
            .unwrap();

        assert_eq!(page.pages(), 3);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[tokio::test]
    async fn test_not_owned() {
        let logs = MockScanLogRepository::new();
        let service = ScanService::new(Arc::new(records_returning(None)), Arc::new(logs));

        assert!(matches!(
            service.list_scan_logs(2, "qr_1_abc", None, None).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_zero_page() {
        let service = ScanService::new(
            Arc::new(MockQrRepository::new()),
            Arc::new(MockScanLogRepository::new()),
        );

        assert!(matches!(
            service.list_scan_logs(1, "qr_1_abc", Some(0), None).await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            service.list_scan_logs(1, "qr_1_abc", Some(1), Some(0)).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_pages_of_empty() {
        let page = ScanLogPage {
            record: record(),
            logs: vec![],
            page: 1,
            per_page: 50,
            total: 0,
        };
        assert_eq!(page.pages(), 0);
        assert!(!page.has_next());
    }
}
