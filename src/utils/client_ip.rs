//! Client IP extraction from the connection and proxy headers.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Placeholder recorded when no client address is available.
pub const UNKNOWN_IP: &str = "unknown";

/// Determines the client IP for a request.
///
/// When `behind_proxy` is set, the first valid address in `X-Forwarded-For`
/// wins, then `X-Real-IP`. Otherwise, or when neither header carries a usable
/// address, the socket peer address is used.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip.to_string();
    }

    peer.map(|addr| addr.ip().to_canonical().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_xff = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    from_xff.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    })
}

/// Returns true for the placeholder and for loopback addresses (v4, v6 and
/// IPv4-mapped v6). Such clients are never sent to the geolocation service.
pub fn is_local_address(ip: &str) -> bool {
    if ip == UNKNOWN_IP {
        return true;
    }

    ip.parse::<IpAddr>()
        .map(|addr| addr.to_canonical().is_loopback())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("198.51.100.4:5555".parse().unwrap())
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));

        assert_eq!(client_ip(&headers, peer(), false), "198.51.100.4");
    }

    #[test]
    fn test_forwarded_for_first_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));

        assert_eq!(client_ip(&headers, peer(), true), "2001:db8::1");
    }

    #[test]
    fn test_missing_everything_is_unknown() {
        assert_eq!(client_ip(&HeaderMap::new(), None, true), UNKNOWN_IP);
    }

    #[test]
    fn test_mapped_peer_is_canonicalized() {
        let mapped: SocketAddr = "[::ffff:127.0.0.1]:80".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(mapped), false), "127.0.0.1");
    }

    #[test]
    fn test_local_addresses() {
        assert!(is_local_address("unknown"));
        assert!(is_local_address("127.0.0.1"));
        assert!(is_local_address("127.1.2.3"));
        assert!(is_local_address("::1"));
        assert!(is_local_address("::ffff:127.0.0.1"));
    }

    #[test]
    fn test_remote_addresses() {
        assert!(!is_local_address("8.8.8.8"));
        assert!(!is_local_address("2001:db8::1"));
        assert!(!is_local_address("not-an-ip"));
    }
}
