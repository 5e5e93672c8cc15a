//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.
//! Clients are identified by the connection's peer address. The
//! `X-Forwarded-For` header is only consulted when the server sits behind
//! a trusted proxy, and then only the hop that proxy appended.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;

/// Default requests allowed per client per minute.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;

/// How often idle client entries are dropped.
pub const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    quota: Quota,
    trust_forwarded_for: bool,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

impl RateLimiterState {
    /// Creates a limiter allowing `requests` per minute per client, all
    /// available as an initial burst. Zero is treated as one.
    pub fn per_minute(requests: u32) -> Self {
        let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self::with_quota(Quota::per_minute(requests))
    }

    pub fn with_quota(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota),
            quota,
            trust_forwarded_for: false,
        }
    }

    /// Returns a fresh limiter with the same quota that keys on the last
    /// `X-Forwarded-For` hop when `trust` is set.
    pub fn trusting_proxy(&self, trust: bool) -> Self {
        Self {
            trust_forwarded_for: trust,
            ..Self::with_quota(self.quota)
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }

    /// Drops clients whose buckets have refilled completely.
    pub fn evict_idle(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    fn client_ip(&self, request: &Request<Body>) -> IpAddr {
        if self.trust_forwarded_for {
            let forwarded = request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.rsplit(',').next())
                .and_then(|s| s.trim().parse().ok());
            if let Some(ip) = forwarded {
                return ip;
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let client = limiter.client_ip(&request);

    if !limiter.check(client) {
        tracing::debug!(%client, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "code": 429,
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
