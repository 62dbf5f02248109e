//! In-memory, per-IP rate limiting for the login route.

use crate::error::ApiError;
use crate::server::ProcureServer;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_seconds: 60,
        }
    }
}

/// Rate limit entry tracking requests in a time window
#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

/// In-memory rate limiter (for single-instance deployments).
#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Check if a request under `key` is allowed in the current window.
    pub async fn check(&self, key: &str) -> Result<(), ApiError> {
        let mut entries = self.entries.write().await;

        // Clean up old entries periodically
        if entries.len() > 10_000 {
            let window = self.config.window_seconds;
            entries.retain(|_, entry| entry.window_start.elapsed().as_secs() < window);
        }

        let now = Instant::now();
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                window_start: now,
            });

        // Reset if window expired
        if entry.window_start.elapsed().as_secs() >= self.config.window_seconds {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.config.max_requests {
            return Err(ApiError::rate_limit(
                "Too many requests from this IP, please try again later.",
            ));
        }

        entry.count += 1;
        Ok(())
    }

    /// Remaining requests in the current window, for tests and headers.
    pub async fn remaining(&self, key: &str) -> u32 {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry)
                if entry.window_start.elapsed().as_secs() < self.config.window_seconds =>
            {
                self.config.max_requests.saturating_sub(entry.count)
            }
            _ => self.config.max_requests,
        }
    }
}

/// Route-level middleware for credential endpoints, keyed by client IP.
pub async fn limit_login_attempts(
    State(server): State<ProcureServer>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = super::client_ip(&request);
    server.rate_limiter.check(&key).await?;
    Ok(next.run(request).await)
}
