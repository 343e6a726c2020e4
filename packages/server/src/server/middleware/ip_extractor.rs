use axum::{
    extract::{ConnectInfo, Request},
    http::{header::USER_AGENT, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::common::client_info::{ClientInfo, UNKNOWN};

/// Middleware to extract client address and user agent from the request
///
/// Address priority:
/// 1. X-Forwarded-For header (first hop, for requests through proxies)
/// 2. X-Real-IP header (for Nginx)
/// 3. ConnectInfo socket address (direct connection)
pub async fn extract_client_info(mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let info = client_info_from_parts(request.headers(), peer);
    request.extensions_mut().insert(info);

    next.run(request).await
}

pub fn client_info_from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientInfo {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    let ip_address = forwarded
        .or(real_ip)
        .map(String::from)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string();

    ClientInfo {
        ip_address,
        user_agent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.7:51000".parse().unwrap())
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_info_from_parts(&headers, peer()).ip_address, "203.0.113.5");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_info_from_parts(&headers, peer()).ip_address, "198.51.100.2");
    }

    #[test]
    fn test_socket_fallback_and_unknowns() {
        let headers = HeaderMap::new();

        let info = client_info_from_parts(&headers, peer());
        assert_eq!(info.ip_address, "192.0.2.7");
        assert_eq!(info.user_agent, "unknown");

        assert_eq!(client_info_from_parts(&headers, None).ip_address, "unknown");
    }

    #[test]
    fn test_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        assert_eq!(client_info_from_parts(&headers, None).user_agent, "Mozilla/5.0");
    }
}
