//! Scan log entity: one immutable record per short-link resolution.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Coarse device classification derived from the User-Agent header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    /// Classifies a User-Agent by case-insensitive substring match.
    ///
    /// Mobile markers are checked first, so an Android tablet reporting
    /// "android" is classified as mobile. Anything unrecognised, including a
    /// missing header, is desktop.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent else {
            return DeviceType::Desktop;
        };
        let ua = ua.to_lowercase();

        if ["mobile", "android", "iphone"].iter().any(|m| ua.contains(m)) {
            DeviceType::Mobile
        } else if ["tablet", "ipad"].iter().any(|m| ua.contains(m)) {
            DeviceType::Tablet
        } else {
            DeviceType::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(DeviceType::Mobile),
            "tablet" => Ok(DeviceType::Tablet),
            "desktop" => Ok(DeviceType::Desktop),
            other => Err(format!("unknown device type '{other}'")),
        }
    }
}

/// A persisted scan event.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanLog {
    pub id: i64,
    pub qr_code_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub device_type: DeviceType,
    pub scanned_at: DateTime<Utc>,
}

/// Request metadata captured for a scan.
///
/// The owning record is resolved inside the visit transaction, so it is not
/// part of this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub device_type: DeviceType,
}
