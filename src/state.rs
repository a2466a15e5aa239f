//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, JwtService, QrService, RedirectService, ScanService};
use crate::infrastructure::persistence::{
    PgQrRepository, PgRefreshTokenRepository, PgScanLogRepository, PgShortLinkRepository,
    PgUserRepository,
};

pub type AppQrService = QrService<PgQrRepository>;
pub type AppRedirectService = RedirectService<PgShortLinkRepository>;
pub type AppScanService = ScanService<PgQrRepository, PgScanLogRepository>;
pub type AppAuthService = AuthService<PgUserRepository, PgRefreshTokenRepository>;

/// Settings the services are built from.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Public origin short links are built on.
    pub base_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    /// HMAC key for stored refresh token hashes.
    pub token_signing_secret: String,
    pub refresh_token_ttl_days: i64,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub qr_service: Arc<AppQrService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub scan_service: Arc<AppScanService>,
    pub auth_service: Arc<AppAuthService>,
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires PostgreSQL repositories into the services.
    pub fn new(pool: Arc<PgPool>, settings: ServiceSettings) -> Self {
        let qr_repository = Arc::new(PgQrRepository::new(pool.clone()));
        let short_link_repository = Arc::new(PgShortLinkRepository::new(pool.clone()));
        let scan_log_repository = Arc::new(PgScanLogRepository::new(pool.clone()));
        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let token_repository = Arc::new(PgRefreshTokenRepository::new(pool.clone()));

        let jwt = JwtService::new(&settings.jwt_secret, settings.access_token_ttl_seconds);

        Self {
            qr_service: Arc::new(QrService::new(qr_repository.clone(), settings.base_url)),
            redirect_service: Arc::new(RedirectService::new(short_link_repository)),
            scan_service: Arc::new(ScanService::new(qr_repository, scan_log_repository)),
            auth_service: Arc::new(AuthService::new(
                user_repository,
                token_repository,
                jwt,
                settings.token_signing_secret,
                settings.refresh_token_ttl_days,
            )),
            behind_proxy: settings.behind_proxy,
            pool,
        }
    }
}
