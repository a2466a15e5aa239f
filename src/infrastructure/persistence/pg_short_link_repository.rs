//! PostgreSQL implementation of short link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ScanMetadata, ShortLink, Visit};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    short_code: String,
    original_url: String,
    qr_code_id: Option<String>,
    clicks: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink {
            short_code: row.short_code,
            original_url: row.original_url,
            qr_code_id: row.qr_code_id,
            clicks: row.clicks,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for the redirect hot path.
///
/// Concurrent visits on one code serialize on the short link's row lock,
/// which `UPDATE ... RETURNING` takes before reading the destination.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn record_visit(
        &self,
        code: &str,
        scan: ScanMetadata,
    ) -> Result<Option<Visit>, AppError> {
        let mut tx = self.pool.begin().await?;

        let link: Option<(String, Option<String>, i64)> = sqlx::query_as(
            r#"
            UPDATE short_links
            SET clicks = clicks + 1, updated_at = NOW()
            WHERE short_code = $1 AND is_active
            RETURNING original_url, qr_code_id, clicks
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((destination, qr_code_id, clicks)) = link else {
            return Ok(None);
        };

        // Rolled back on drop: the visit must not count if no redirect can be sent.
        if destination.chars().any(char::is_control) {
            tracing::error!(short_code = %code, "Stored destination is not a valid Location header");
            return Err(AppError::internal(
                "Internal server error",
                json!({ "short_code": code }),
            ));
        }

        let mut scans = None;

        if let Some(record_id) = &qr_code_id {
            scans = sqlx::query_scalar::<_, i64>(
                r#"
                UPDATE qr_codes
                SET scans = scans + 1
                WHERE id = $1
                RETURNING scans
                "#,
            )
            .bind(record_id)
            .fetch_optional(&mut *tx)
            .await?;

            if scans.is_some() {
                sqlx::query(
                    r#"
                    INSERT INTO qr_scan_logs
                        (qr_code_id, ip_address, user_agent, referer, country, device_type)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(record_id)
                .bind(&scan.ip_address)
                .bind(&scan.user_agent)
                .bind(&scan.referer)
                .bind(&scan.country)
                .bind(scan.device_type.as_str())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(Some(Visit {
            destination,
            qr_code_id,
            clicks,
            scans,
        }))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT short_code, original_url, qr_code_id, clicks, is_active, created_at, updated_at
            FROM short_links
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }
}
