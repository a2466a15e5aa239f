//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped onto `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgQrRepository`] - QR records and their short links
//! - [`PgShortLinkRepository`] - Transactional visit recording
//! - [`PgScanLogRepository`] - Scan log pagination
//! - [`PgUserRepository`] - Accounts and login lockout
//! - [`PgRefreshTokenRepository`] - Refresh token storage

pub mod pg_qr_repository;
pub mod pg_scan_log_repository;
pub mod pg_short_link_repository;
pub mod pg_user_repository;

pub use pg_qr_repository::PgQrRepository;
pub use pg_scan_log_repository::PgScanLogRepository;
pub use pg_short_link_repository::PgShortLinkRepository;
pub use pg_user_repository::{PgRefreshTokenRepository, PgUserRepository};
