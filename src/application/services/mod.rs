//! Business logic services for the application layer.

pub mod auth_service;
pub mod jwt_service;
pub mod qr_service;
pub mod redirect_service;
pub mod scan_service;

pub use auth_service::{AuthService, LoginContext, TokenPair};
pub use jwt_service::JwtService;
pub use qr_service::{AppearanceUpdate, CreateOutcome, CreateQrCode, QrService};
pub use redirect_service::{RedirectService, ScanContext};
pub use scan_service::{ScanLogPage, ScanService};
