//! PostgreSQL implementation of QR record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AppearancePatch, NewQrRecord, QrRecord};
use crate::domain::repositories::{InsertOutcome, QrRepository};
use crate::error::AppError;

const QR_COLUMNS: &str = "id, user_id, type, data, original_url, color, background_color, size, \
     is_dynamic, short_code, short_url, status, scans, expires_at, validity_duration, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct QrRow {
    id: String,
    user_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    data: String,
    original_url: Option<String>,
    color: String,
    background_color: String,
    size: i32,
    is_dynamic: bool,
    short_code: Option<String>,
    short_url: Option<String>,
    status: String,
    scans: i64,
    expires_at: DateTime<Utc>,
    validity_duration: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QrRow> for QrRecord {
    type Error = AppError;

    fn try_from(row: QrRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|reason: String| {
            AppError::internal(
                "Corrupt QR record",
                json!({ "id": row.id, "reason": reason }),
            )
        })?;

        Ok(QrRecord {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind,
            data: row.data,
            original_url: row.original_url,
            color: row.color,
            background_color: row.background_color,
            size: row.size,
            is_dynamic: row.is_dynamic,
            short_code: row.short_code,
            short_url: row.short_url,
            status,
            scans: row.scans,
            expires_at: row.expires_at,
            validity_duration: row.validity_duration,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for QR records and their short links.
pub struct PgQrRepository {
    pool: Arc<PgPool>,
}

impl PgQrRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn content_lookup_sql() -> String {
    format!(
        "SELECT {QR_COLUMNS} FROM qr_codes \
         WHERE user_id = $1 AND type = $2 AND is_dynamic = $4 \
           AND (data = $3 OR (is_dynamic AND original_url = $3)) \
         ORDER BY created_at ASC \
         LIMIT 1"
    )
}

#[async_trait]
impl QrRepository for PgQrRepository {
    async fn insert(&self, new: NewQrRecord) -> Result<InsertOutcome, AppError> {
        let payload = new.original_url.as_deref().unwrap_or(&new.data);
        let lock_key = format!(
            "{}:{}:{}:{}",
            new.user_id,
            new.kind,
            new.is_dynamic(),
            payload
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&lock_key)
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, QrRow>(&content_lookup_sql())
            .bind(new.user_id)
            .bind(&new.kind)
            .bind(payload)
            .bind(new.is_dynamic())
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(row) = existing {
            tx.commit().await?;
            return Ok(InsertOutcome::Duplicate(row.try_into()?));
        }

        let row = sqlx::query_as::<_, QrRow>(&format!(
            r#"
            INSERT INTO qr_codes (
                id, user_id, type, data, original_url, color, background_color, size,
                is_dynamic, short_code, short_url, expires_at, validity_duration
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {QR_COLUMNS}
            "#
        ))
        .bind(&new.id)
        .bind(new.user_id)
        .bind(&new.kind)
        .bind(&new.data)
        .bind(&new.original_url)
        .bind(&new.color)
        .bind(&new.background_color)
        .bind(new.size)
        .bind(new.is_dynamic())
        .bind(&new.short_code)
        .bind(&new.short_url)
        .bind(new.expires_at)
        .bind(&new.validity_duration)
        .fetch_one(&mut *tx)
        .await?;

        if let (Some(code), Some(destination)) = (&new.short_code, &new.original_url) {
            sqlx::query(
                r#"
                INSERT INTO short_links (short_code, original_url, qr_code_id)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(code)
            .bind(destination)
            .bind(&new.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(InsertOutcome::Created(row.try_into()?))
    }

    async fn find_by_content(
        &self,
        owner: i64,
        kind: &str,
        data: &str,
        is_dynamic: bool,
    ) -> Result<Option<QrRecord>, AppError> {
        let row = sqlx::query_as::<_, QrRow>(&content_lookup_sql())
            .bind(owner)
            .bind(kind)
            .bind(data)
            .bind(is_dynamic)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(QrRecord::try_from).transpose()
    }

    async fn find_owned(&self, owner: i64, id: &str) -> Result<Option<QrRecord>, AppError> {
        let row = sqlx::query_as::<_, QrRow>(&format!(
            "SELECT {QR_COLUMNS} FROM qr_codes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(QrRecord::try_from).transpose()
    }

    async fn list_by_owner(&self, owner: i64) -> Result<Vec<QrRecord>, AppError> {
        let rows = sqlx::query_as::<_, QrRow>(&format!(
            r#"
            SELECT {QR_COLUMNS}
            FROM qr_codes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(QrRecord::try_from).collect()
    }

    async fn set_destination(
        &self,
        owner: i64,
        id: &str,
        destination: &str,
    ) -> Result<Option<QrRecord>, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<String> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM qr_codes
            WHERE id = $1 AND user_id = $2 AND is_dynamic
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let link_updated = sqlx::query(
            r#"
            UPDATE short_links
            SET original_url = $1, updated_at = NOW()
            WHERE qr_code_id = $2
            "#,
        )
        .bind(destination)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if link_updated == 0 {
            tracing::error!(qr_code_id = %id, "Dynamic QR record has no short link");
            return Ok(None);
        }

        let row = sqlx::query_as::<_, QrRow>(&format!(
            r#"
            UPDATE qr_codes
            SET original_url = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {QR_COLUMNS}
            "#
        ))
        .bind(destination)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(row.try_into()?))
    }

    async fn update_appearance(
        &self,
        owner: i64,
        id: &str,
        patch: AppearancePatch,
    ) -> Result<Option<QrRecord>, AppError> {
        // Payload of dynamic records is system-managed, hence the CASE.
        let row = sqlx::query_as::<_, QrRow>(&format!(
            r#"
            UPDATE qr_codes
            SET color            = COALESCE($3, color),
                background_color = COALESCE($4, background_color),
                size             = COALESCE($5, size),
                data             = CASE WHEN is_dynamic THEN data ELSE COALESCE($6, data) END,
                updated_at       = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {QR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(&patch.color)
        .bind(&patch.background_color)
        .bind(patch.size)
        .bind(&patch.data)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(QrRecord::try_from).transpose()
    }

    async fn delete_owned(&self, owner: i64, id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM qr_codes
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM short_links WHERE qr_code_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }
}
