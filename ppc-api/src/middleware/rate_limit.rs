//! Rate Limiting Middleware
//!
//! Token bucket per client address. Clients are identified by the socket
//! address when available, otherwise by `X-Forwarded-For`.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::ErrorResponse;

pub const RATE_LIMITED: &str = "RATE_LIMITED";

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Sustained requests per window
    pub max_requests: u32,
    pub window: Duration,
    /// Bucket size
    pub burst_capacity: u32,
}

impl RateLimitConfig {
    /// `requests` per minute with a burst of the same size
    pub fn per_minute(requests: u32) -> Self {
        Self {
            max_requests: requests,
            window: Duration::from_secs(60),
            burst_capacity: requests,
        }
    }

    fn refill_rate(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_minute(100)
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    max_tokens: f64,
    /// Tokens per second
    refill_rate: f64,
}

impl TokenBucket {
    fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            tokens: f64::from(max_tokens),
            last_refill: Instant::now(),
            max_tokens: f64::from(max_tokens),
            refill_rate,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }

    fn remaining(&self) -> u32 {
        self.tokens as u32
    }

    fn retry_after(&self) -> Duration {
        if self.tokens >= 1.0 || self.refill_rate <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
        }
    }
}

/// Outcome of one bucket check
#[derive(Debug, Clone, Copy)]
struct Decision {
    allowed: bool,
    remaining: u32,
    retry_after: Duration,
}

/// Rate limiter state
#[derive(Clone)]
pub struct RateLimiter {
    config: Arc<RateLimitConfig>,
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config: Arc::new(config),
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    async fn check(&self, key: &str) -> Decision {
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(key.to_string()).or_insert_with(|| {
            TokenBucket::new(self.config.burst_capacity, self.config.refill_rate())
        });

        let allowed = bucket.try_consume();
        Decision {
            allowed,
            remaining: bucket.remaining(),
            retry_after: bucket.retry_after(),
        }
    }

    /// Drop buckets idle for two windows
    pub async fn cleanup(&self) {
        let mut buckets = self.buckets.lock().await;
        let Some(expiry) = Instant::now().checked_sub(self.config.window * 2) else {
            return;
        };
        buckets.retain(|_, bucket| bucket.last_refill > expiry);
    }

    /// Periodically run [`RateLimiter::cleanup`] in the background
    pub fn spawn_cleanup(&self, interval: Duration) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                limiter.cleanup().await;
            }
        });
    }
}

/// Rate limit error
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: Duration,
    pub limit: u32,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(
            RATE_LIMITED,
            "Too many requests from this client, please try again later",
        );
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

        let headers = response.headers_mut();
        headers.insert("X-RateLimit-Limit", HeaderValue::from(self.limit));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from(0u32));
        headers.insert(
            "Retry-After",
            HeaderValue::from(self.retry_after.as_secs().max(1)),
        );
        response
    }
}

fn client_key(connect_info: Option<&ConnectInfo<SocketAddr>>, request: &Request) -> String {
    connect_info
        .map(|ci| ci.0.ip().to_string())
        .or_else(|| {
            request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "global".to_string())
}

/// Rate limit middleware
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let key = client_key(connect_info.as_ref(), &request);
    let decision = limiter.check(&key).await;

    if !decision.allowed {
        warn!(client = %key, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: decision.retry_after,
            limit: limiter.config.max_requests,
        });
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "X-RateLimit-Limit",
        HeaderValue::from(limiter.config.max_requests),
    );
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    Ok(response)
}
