//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code and record id generation
//! - [`url_validator`] - Destination URL validation
//! - [`timestamp`] - Lenient ISO-8601 parsing
//! - [`password`] - Argon2id password hashing
//! - [`tokens`] - Refresh token generation and keyed hashing
//! - [`client_ip`] - Client address and header extraction

pub mod client_ip;
pub mod code_generator;
pub mod password;
pub mod timestamp;
pub mod tokens;
pub mod url_validator;
