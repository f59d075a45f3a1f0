//! Rate limiting for the auth endpoints using governor and `tower_governor`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::AppError;

/// Key extractor that trusts proxy headers first, then the TCP peer.
///
/// Order: `CF-Connecting-IP`, the first `X-Forwarded-For` entry,
/// `X-Real-IP`, `Fly-Client-IP`. The peer address is only
/// available when the server runs with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        let header_ip = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        let forwarded_for = || {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };
        let peer = || {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        };

        header_ip("cf-connecting-ip")
            .or_else(forwarded_for)
            .or_else(|| header_ip("x-real-ip"))
            .or_else(|| header_ip("fly-client-ip"))
            .or_else(peer)
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// Never: `per_second(6)` and `burst_size(5)` are both non-zero, which is all
/// `GovernorConfigBuilder::finish` checks.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config)).error_handler(governor_error_response)
}

/// Render limiter failures as `{"error": ...}` bodies, keeping the
/// `retry-after` headers on a 429.
fn governor_error_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::warn!(wait_time, "auth rate limit exceeded");
            let mut response = AppError::RateLimited.into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            AppError::Internal("could not determine client address".to_string()).into_response()
        }
        GovernorError::Other { code, msg, .. } => AppError::Internal(format!(
            "rate limiter failed with {code}: {}",
            msg.unwrap_or_default()
        ))
        .into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_prefers_cloudflare_header() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("cf-connecting-ip", "203.0.113.7"),
        ]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_uses_first_forwarded_for_entry() {
        let req = request(&[("x-forwarded-for", "198.51.100.4, 10.0.0.2")]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "198.51.100.4");
    }

    #[tokio::test]
    async fn test_limiter_errors_render_as_json() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("retry-after", "5".parse().unwrap());
        let response = governor_error_response(GovernorError::TooManyRequests {
            wait_time: 5,
            headers: Some(headers),
        });
        assert_eq!(response.status(), axum::http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "5");
        assert_eq!(response.headers()["content-type"], "application/json");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Too many requests");

        let response = governor_error_response(GovernorError::UnableToExtractKey);
        assert_eq!(
            response.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request(&[]);
        assert!(ClientIpKeyExtractor.extract(&req).is_err());

        let peer: SocketAddr = "192.0.2.9:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.9");
    }
}
