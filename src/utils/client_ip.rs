//! Client key derivation for rate limiting and unique-visitor tracking.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// The client key derived for a request, stored as a request extension by
/// the rate-limit middleware so downstream handlers reuse the same key.
#[derive(Debug, Clone)]
pub struct ClientKey(pub String);

/// Derives the client key for a request.
///
/// With `behind_proxy` set, `X-Forwarded-For` (first hop) and `X-Real-IP`
/// take precedence over the peer address; enable that only behind a trusted
/// reverse proxy, since the headers are client-controlled otherwise.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(ip) = header_ip(headers, "x-forwarded-for") {
            return ip;
        }
        if let Some(ip) = header_ip(headers, "x-real-ip") {
            return ip;
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.7:4242".parse().unwrap())
    }

    #[test]
    fn uses_peer_address_by_default() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, peer(), false), "192.0.2.7");
    }

    #[test]
    fn proxy_headers_are_ignored_unless_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));

        assert_eq!(client_key(&headers, peer(), false), "192.0.2.7");
        assert_eq!(client_key(&headers, peer(), true), "203.0.113.9");
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1, 10.0.0.2"),
        );

        assert_eq!(client_key(&headers, peer(), true), "203.0.113.9");
    }

    #[test]
    fn real_ip_is_the_fallback_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));

        assert_eq!(client_key(&headers, peer(), true), "198.51.100.4");
    }

    #[test]
    fn missing_peer_degrades_to_a_shared_key() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, None, false), "unknown");
    }
}
