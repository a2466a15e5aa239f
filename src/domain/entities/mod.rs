//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. The only logic they carry is derived
//! predicates that must be recomputed on every read (activity, lockout) and
//! the device classification shared by the resolver and the scan log.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account
//! - [`QrRecord`] - A QR code, static or dynamic
//! - [`ShortLink`] - The short-code → destination mapping of a dynamic record
//! - [`ScanLog`] - An immutable scan event
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewUser`, `NewQrRecord`, `NewRefreshToken` - For creating new records
//! - `AppearancePatch` - For allowlisted partial updates

pub mod qr_record;
pub mod scan_log;
pub mod short_link;
pub mod user;

pub use qr_record::{AppearancePatch, NewQrRecord, QrRecord, QrStatus};
pub use scan_log::{DeviceType, ScanLog, ScanMetadata};
pub use short_link::{ShortLink, Visit};
pub use user::{NewRefreshToken, NewUser, RefreshToken, User};
