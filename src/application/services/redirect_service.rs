//! Short-link resolution for the public redirect endpoint.

use std::sync::Arc;

use crate::domain::entities::{DeviceType, ScanMetadata, Visit};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::client_ip::{MAX_REFERER_LENGTH, truncate_chars};
use crate::utils::code_generator::is_valid_short_code;
use serde_json::json;

/// Request metadata available at scan time.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Service resolving short codes to their current destination.
///
/// Every successful resolution is recorded atomically: click counter, scan
/// counter and scan log either all commit or none do. Redirect targets are
/// never cached; each scan reads the destination as of that moment.
pub struct RedirectService<S: ShortLinkRepository> {
    repository: Arc<S>,
}

impl<S: ShortLinkRepository> RedirectService<S> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    /// Resolves `code` and records the visit.
    ///
    /// Only the short link's `is_active` flag gates the redirect; the owning
    /// record's `expires_at` is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or no active
    /// link has it; nothing is written in that case.
    /// Returns [`AppError::Internal`] if the visit could not be committed.
    pub async fn resolve(&self, code: &str, context: ScanContext) -> Result<Visit, AppError> {
        if !is_valid_short_code(code) {
            metrics::counter!("qr_scan_misses_total").increment(1);
            return Err(not_found(code));
        }

        let device_type = DeviceType::from_user_agent(context.user_agent.as_deref());

        let scan = ScanMetadata {
            ip_address: context.ip_address,
            user_agent: context.user_agent,
            referer: context
                .referer
                .map(|r| truncate_chars(r, MAX_REFERER_LENGTH)),
            country: None,
            device_type,
        };

        let Some(visit) = self.repository.record_visit(code, scan).await? else {
            metrics::counter!("qr_scan_misses_total").increment(1);
            tracing::debug!(code, "Short link not found or inactive");
            return Err(not_found(code));
        };

        metrics::counter!("qr_scans_total", "device" => device_type.as_str()).increment(1);
        tracing::info!(
            code,
            qr_code_id = visit.qr_code_id.as_deref().unwrap_or("-"),
            clicks = visit.clicks,
            device = %device_type,
            "Short link resolved"
        );

        Ok(visit)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
