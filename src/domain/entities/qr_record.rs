//! QR record entity: a code owned by a user, static or dynamic.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Default foreground color for new records.
pub const DEFAULT_COLOR: &str = "#000000";
/// Default background color for new records.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
/// Default rendered size in pixels.
pub const DEFAULT_SIZE: i32 = 256;
/// Accepted size range for appearance updates.
pub const SIZE_RANGE: std::ops::RangeInclusive<i32> = 100..=1000;

/// Content type tag for payloads that are URLs. Only these can be dynamic.
pub const KIND_URL: &str = "url";

/// Persisted lifecycle status of a record.
///
/// This is not the same as being *active*: see [`QrRecord::is_active_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrStatus {
    Active,
    Expired,
    Disabled,
}

impl QrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrStatus::Active => "active",
            QrStatus::Expired => "expired",
            QrStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for QrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(QrStatus::Active),
            "expired" => Ok(QrStatus::Expired),
            "disabled" => Ok(QrStatus::Disabled),
            other => Err(format!("unknown QR status '{other}'")),
        }
    }
}

/// A QR code record.
///
/// For dynamic records `data` holds the short-link URL that is physically
/// encoded and `original_url` the live destination; for static records `data`
/// is the payload itself and the short-link fields are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct QrRecord {
    pub id: String,
    pub user_id: i64,
    pub kind: String,
    pub data: String,
    pub original_url: Option<String>,
    pub color: String,
    pub background_color: String,
    pub size: i32,
    pub is_dynamic: bool,
    pub short_code: Option<String>,
    pub short_url: Option<String>,
    pub status: QrStatus,
    pub scans: i64,
    pub expires_at: DateTime<Utc>,
    pub validity_duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QrRecord {
    /// Returns true if the record has passed its expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Derived activity predicate: `status == active` and not yet expired.
    ///
    /// Never persisted; evaluate it on every read.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == QrStatus::Active && !self.is_expired_at(now)
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

/// Input for inserting a record. Produced by the QR service only.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQrRecord {
    pub id: String,
    pub user_id: i64,
    pub kind: String,
    pub data: String,
    pub original_url: Option<String>,
    pub color: String,
    pub background_color: String,
    pub size: i32,
    pub short_code: Option<String>,
    pub short_url: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub validity_duration: Option<String>,
}

impl NewQrRecord {
    pub fn is_dynamic(&self) -> bool {
        self.short_code.is_some()
    }
}

/// Allowlisted appearance changes. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppearancePatch {
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub size: Option<i32>,
    pub data: Option<String>,
}

impl AppearancePatch {
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.background_color.is_none()
            && self.size.is_none()
            && self.data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn record(status: QrStatus, expires_at: DateTime<Utc>) -> QrRecord {
        let now = Utc::now();
        QrRecord {
            id: "qr_1700000000000_abcd1234".to_string(),
            user_id: 1,
            kind: "text".to_string(),
            data: "hello".to_string(),
            original_url: None,
            color: DEFAULT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            size: DEFAULT_SIZE,
            is_dynamic: false,
            short_code: None,
            short_url: None,
            status,
            scans: 0,
            expires_at,
            validity_duration: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_requires_status_and_future_expiry() {
        let future = Utc::now() + Duration::days(1);
        assert!(record(QrStatus::Active, future).is_active());
        assert!(!record(QrStatus::Disabled, future).is_active());
        assert!(!record(QrStatus::Expired, future).is_active());
    }

    #[test]
    fn test_past_expiry_is_inactive_even_when_status_active() {
        let past = Utc::now() - Duration::seconds(1);
        let rec = record(QrStatus::Active, past);
        assert!(rec.is_expired_at(Utc::now()));
        assert!(!rec.is_active());
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let at = Utc::now();
        let rec = record(QrStatus::Active, at);
        assert!(!rec.is_active_at(at));
        assert!(rec.is_active_at(at - Duration::milliseconds(1)));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("active".parse::<QrStatus>().unwrap(), QrStatus::Active);
        assert_eq!("disabled".parse::<QrStatus>().unwrap(), QrStatus::Disabled);
        assert!("paused".parse::<QrStatus>().is_err());
        assert_eq!(QrStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn test_appearance_patch_is_empty() {
        assert!(AppearancePatch::default().is_empty());
        let patch = AppearancePatch {
            size: Some(300),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
