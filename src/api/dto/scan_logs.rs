//! DTOs for the scan log listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::dto::pagination::PaginationMeta;
use crate::application::services::ScanLogPage;
use crate::domain::entities::ScanLog;

/// Response for `GET /qr-codes/{id}/scan-logs`.
///
/// ```json
/// {
///   "qr_code_id": "qr_1717171717171_k3j9x0ab",
///   "scan_logs": [ ... ],
///   "pagination": { "page": 1, "per_page": 50, "total": 3, "pages": 1, "has_next": false, "has_prev": false },
///   "summary": { "total_scans": 3, "total_logs": 3 }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ScanLogsResponse {
    pub qr_code_id: String,
    pub scan_logs: Vec<ScanLogItem>,
    pub pagination: PaginationMeta,
    pub summary: ScanSummary,
}

#[derive(Debug, Serialize)]
pub struct ScanSummary {
    /// The record's aggregate scan counter.
    pub total_scans: i64,
    /// Number of scan log rows stored for the record.
    pub total_logs: i64,
}

#[derive(Debug, Serialize)]
pub struct ScanLogItem {
    pub id: i64,
    pub qr_code_id: String,
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub device_type: &'static str,
    pub device_info: DeviceInfo,
    pub location: Location,
}

#[derive(Debug, Serialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub country: Option<String>,
    pub ip_address: Option<String>,
}

impl From<ScanLog> for ScanLogItem {
    fn from(log: ScanLog) -> Self {
        let device_type = log.device_type.as_str();
        Self {
            device_info: DeviceInfo {
                kind: device_type,
                user_agent: log.user_agent.clone(),
            },
            location: Location {
                country: log.country.clone(),
                ip_address: log.ip_address.clone(),
            },
            id: log.id,
            qr_code_id: log.qr_code_id,
            timestamp: log.scanned_at,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            referer: log.referer,
            country: log.country,
            device_type,
        }
    }
}

impl From<ScanLogPage> for ScanLogsResponse {
    fn from(page: ScanLogPage) -> Self {
        let pagination = PaginationMeta::from(&page);
        Self {
            summary: ScanSummary {
                total_scans: page.record.scans,
                total_logs: page.total,
            },
            qr_code_id: page.record.id,
            scan_logs: page.logs.into_iter().map(ScanLogItem::from).collect(),
            pagination,
        }
    }
}
