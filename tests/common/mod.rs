#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, middleware, routing::get};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use qr_manager::api::handlers::{health_handler, redirect_handler};
use qr_manager::api::middleware::auth;
use qr_manager::api::routes::{protected_routes, public_routes};
use qr_manager::state::{AppState, ServiceSettings};
use qr_manager::utils::password::hash_password;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const BASE_URL: &str = "https://qr.example.com";
pub const PASSWORD: &str = "correct horse battery";

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        jwt_secret: "test-jwt-secret".to_string(),
        access_token_ttl_seconds: 900,
        token_signing_secret: "test-signing-secret".to_string(),
        refresh_token_ttl_days: 30,
        behind_proxy: false,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(Arc::new(pool), test_settings())
}

/// The full route table with a fixed peer address, as served in production
/// minus path normalization.
pub fn test_app(state: AppState) -> Router {
    let protected =
        protected_routes().route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/go/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(public_routes())
        .merge(protected)
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub fn test_server(pool: PgPool) -> (TestServer, AppState) {
    let state = create_test_state(pool);
    let server = TestServer::new(test_app(state.clone())).unwrap();
    (server, state)
}

pub async fn create_test_user(pool: &PgPool, email: &str) -> i64 {
    let password_hash = hash_password(PASSWORD).unwrap();

    sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, email_verified) VALUES ($1, $2, TRUE) RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// `Authorization` header value for `user_id`.
pub fn bearer(state: &AppState, user_id: i64) -> String {
    let token = state.auth_service.access_token_for(user_id).unwrap();
    format!("Bearer {token}")
}

pub fn future_timestamp() -> String {
    (Utc::now() + Duration::days(30)).to_rfc3339()
}

pub async fn short_link_clicks(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM short_links WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn record_scans(pool: &PgPool, id: &str) -> i64 {
    sqlx::query_scalar("SELECT scans FROM qr_codes WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn scan_log_count(pool: &PgPool, id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM qr_scan_logs WHERE qr_code_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
