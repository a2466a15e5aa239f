//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::qr_service::QrService`] - QR record creation, updates and deletion
//! - [`services::redirect_service::RedirectService`] - Short-link resolution with scan recording
//! - [`services::scan_service::ScanService`] - Paginated scan log listing
//! - [`services::auth_service::AuthService`] - Accounts, login lockout and tokens

pub mod services;
