//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`QrRepository`] - QR records and their short links
//! - [`ShortLinkRepository`] - Atomic visit recording for redirects
//! - [`ScanLogRepository`] - Paginated scan log reads
//! - [`UserRepository`] - Accounts and login lockout
//! - [`RefreshTokenRepository`] - Refresh token storage
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod qr_repository;
pub mod scan_log_repository;
pub mod short_link_repository;
pub mod user_repository;

pub use qr_repository::{InsertOutcome, QrRepository};
pub use scan_log_repository::ScanLogRepository;
pub use short_link_repository::ShortLinkRepository;
pub use user_repository::{RefreshTokenRepository, UserRepository};

#[cfg(test)]
pub use qr_repository::MockQrRepository;
#[cfg(test)]
pub use scan_log_repository::MockScanLogRepository;
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
#[cfg(test)]
pub use user_repository::{MockRefreshTokenRepository, MockUserRepository};
