//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs are explicit field allowlists: unknown JSON keys are
//! ignored and never reach persisted state. Input keys follow the camelCase
//! convention of existing clients, with snake_case aliases.

pub mod auth;
pub mod health;
pub mod pagination;
pub mod qr_code;
pub mod scan_logs;
