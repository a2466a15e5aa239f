//! Destination URL validation.
//!
//! Destinations are checked but stored verbatim: a dynamic QR code must
//! redirect to exactly what its owner entered.

use url::Url;

/// Maximum accepted length of a destination URL.
pub const MAX_URL_LENGTH: usize = 2000;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL contains control characters")]
    ControlCharacter,
}

/// Validates a destination URL and returns it trimmed.
///
/// # Rules
///
/// 1. **Length**: 1 to [`MAX_URL_LENGTH`] characters after trimming
/// 2. **Protocol**: Only HTTP and HTTPS are allowed
/// 3. **Host**: Must be present
/// 4. **Characters**: No control characters. The value is stored verbatim and
///    later sent as a `Location` header, while [`Url::parse`] would silently
///    drop embedded tabs and newlines.
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     validate_destination_url("  https://Example.com/Path#top ").unwrap(),
///     "https://Example.com/Path#top"
/// );
/// assert!(validate_destination_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_destination_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if trimmed.chars().count() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}
