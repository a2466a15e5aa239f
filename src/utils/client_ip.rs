//! Client address and header extraction for scan logging.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Maximum stored length of the `Referer` header.
pub const MAX_REFERER_LENGTH: usize = 500;

/// Determines the client IP address.
///
/// When `behind_proxy` is set, the first `X-Forwarded-For` entry and then
/// `X-Real-IP` take precedence over the socket peer. Header values that do
/// not parse as IP addresses are ignored.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> Option<String> {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

/// Reads a header as UTF-8, dropping empty values.
pub fn header_string(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Truncates to at most `max` characters on a char boundary.
pub fn truncate_chars(value: String, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.1:5000".parse().unwrap())
    }

    #[test]
    fn test_uses_peer_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        assert_eq!(client_ip(&headers, peer(), false).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_forwarded_for_first_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );

        assert_eq!(client_ip(&headers, peer(), true).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));

        assert_eq!(client_ip(&headers, peer(), true).as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_garbage_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));

        assert_eq!(client_ip(&headers, peer(), true).as_deref(), Some("10.0.0.1"));
        assert_eq!(client_ip(&headers, None, true), None);
    }

    #[test]
    fn test_header_string_drops_empty() {
        let mut headers = HeaderMap::new();
        headers.insert("referer", HeaderValue::from_static("  "));
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));

        assert_eq!(header_string(&headers, "referer"), None);
        assert_eq!(header_string(&headers, "user-agent").as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef".to_string(), 3), "abc");
        assert_eq!(truncate_chars("abc".to_string(), 3), "abc");
        assert_eq!(truncate_chars("ééé".to_string(), 2), "éé");
    }
}
