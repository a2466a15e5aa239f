//! PostgreSQL implementation of scan log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ScanLog;
use crate::domain::repositories::ScanLogRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ScanLogRow {
    id: i64,
    qr_code_id: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
    country: Option<String>,
    device_type: String,
    scanned_at: DateTime<Utc>,
}

impl TryFrom<ScanLogRow> for ScanLog {
    type Error = AppError;

    fn try_from(row: ScanLogRow) -> Result<Self, Self::Error> {
        let device_type = row.device_type.parse().map_err(|reason: String| {
            AppError::internal("Corrupt scan log", json!({ "id": row.id, "reason": reason }))
        })?;

        Ok(ScanLog {
            id: row.id,
            qr_code_id: row.qr_code_id,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            referer: row.referer,
            country: row.country,
            device_type,
            scanned_at: row.scanned_at,
        })
    }
}

/// PostgreSQL repository for scan log reads.
pub struct PgScanLogRepository {
    pool: Arc<PgPool>,
}

impl PgScanLogRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanLogRepository for PgScanLogRepository {
    async fn list_for_record(
        &self,
        qr_code_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ScanLog>, AppError> {
        let rows = sqlx::query_as::<_, ScanLogRow>(
            r#"
            SELECT id, qr_code_id, ip_address, user_agent, referer, country, device_type, scanned_at
            FROM qr_scan_logs
            WHERE qr_code_id = $1
            ORDER BY scanned_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(qr_code_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ScanLog::try_from).collect()
    }

    async fn count_for_record(&self, qr_code_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qr_scan_logs WHERE qr_code_id = $1")
            .bind(qr_code_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
