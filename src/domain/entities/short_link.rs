//! Short link entity backing a dynamic QR record.

use chrono::{DateTime, Utc};

/// Maps a short code to the live destination of a dynamic QR record.
///
/// Owned 1:1 by the record referenced in `qr_code_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub short_code: String,
    pub original_url: String,
    pub qr_code_id: Option<String>,
    pub clicks: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of one committed visit on a short link.
///
/// `destination` is read in the same transaction that incremented the
/// counters. `scans` is `None` when the link has no owning record.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub destination: String,
    pub qr_code_id: Option<String>,
    pub clicks: i64,
    pub scans: Option<i64>,
}
