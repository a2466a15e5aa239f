//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod qr_codes;
pub mod redirect;
pub mod scan_logs;

pub use auth::{login_handler, logout_handler, me_handler, refresh_handler, register_handler};
pub use health::health_handler;
pub use qr_codes::{
    create_qr_code_handler, delete_qr_code_handler, get_qr_code_handler, list_qr_codes_handler,
    update_qr_code_handler, update_url_handler,
};
pub use redirect::redirect_handler;
pub use scan_logs::scan_logs_handler;
