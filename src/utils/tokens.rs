//! Opaque refresh token generation and keyed hashing.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of random bytes in a refresh token before encoding.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates a refresh token: 32 random bytes as URL-safe base64 without padding.
pub fn generate_refresh_token() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; REFRESH_TOKEN_BYTES];
    getrandom::fill(&mut buffer)?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Hashes tokens with HMAC-SHA256 keyed by a server-side secret.
///
/// A database dump alone is not enough to verify or forge tokens.
#[derive(Clone)]
pub struct TokenHasher {
    secret: String,
}

impl TokenHasher {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
