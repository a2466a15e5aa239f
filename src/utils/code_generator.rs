//! Short code and record id generation.
//!
//! Candidates are random but not guaranteed unique. Callers insert them under
//! a uniqueness constraint and retry with a fresh candidate on collision.

use chrono::Utc;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Length of generated short codes.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Length of the random suffix of record ids.
const RECORD_ID_SUFFIX_LENGTH: usize = 8;

const SHORT_CODE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const RECORD_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap());

fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Generates a 6-character short code from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_short_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_short_code() -> String {
    random_string(SHORT_CODE_ALPHABET, SHORT_CODE_LENGTH)
}

/// Generates a record id of the form `qr_{unix_millis}_{8 random [a-z0-9]}`.
pub fn generate_record_id() -> String {
    format!(
        "qr_{}_{}",
        Utc::now().timestamp_millis(),
        random_string(RECORD_ID_ALPHABET, RECORD_ID_SUFFIX_LENGTH)
    )
}

/// Returns true if `code` could have been issued as a short code.
///
/// Anything else can be rejected without a storage lookup.
pub fn is_valid_short_code(code: &str) -> bool {
    SHORT_CODE_REGEX.is_match(code)
}
