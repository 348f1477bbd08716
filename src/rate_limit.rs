//! Token-bucket rate limiter for Zotero API requests.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Rate limiter that enforces a maximum request rate.
///
/// Uses a token-bucket algorithm. Also tracks the `Backoff` and
/// `Retry-After` headers Zotero sends under load, pausing all requests
/// for the server-requested interval.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

#[derive(Debug)]
struct RateLimiterInner {
    /// Maximum requests per second.
    max_per_second: f64,
    /// Time of the last request.
    last_request: Option<Instant>,
    /// Server-requested pause; no request may be sent before this instant.
    backoff_until: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given maximum requests per second.
    pub fn new(max_per_second: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                max_per_second,
                last_request: None,
                backoff_until: None,
            })),
        }
    }

    /// Wait until a request is allowed, then mark it as sent.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;

        // Honor a server-requested backoff first
        if let Some(until) = inner.backoff_until {
            let now = Instant::now();
            if now < until {
                let wait = until - now;
                drop(inner);
                tokio::time::sleep(wait).await;
                inner = self.inner.lock().await;
            }
            inner.backoff_until = None;
        }

        // Enforce local rate limit
        if let Some(last) = inner.last_request {
            let min_interval = Duration::from_secs_f64(1.0 / inner.max_per_second);
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                drop(inner);
                tokio::time::sleep(wait).await;
                inner = self.inner.lock().await;
            }
        }

        inner.last_request = Some(Instant::now());
    }

    /// Update rate limiter with headers from a Zotero API response.
    ///
    /// `Backoff` arrives on successful responses when the server is under
    /// load; `Retry-After` accompanies 429/503 responses.
    pub async fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let backoff_secs = headers
            .get("backoff")
            .or_else(|| headers.get("retry-after"))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if let Some(secs) = backoff_secs {
            self.pause_for(Duration::from_secs(secs)).await;
        }
    }

    /// Pause all requests for the given duration.
    pub(crate) async fn pause_for(&self, duration: Duration) {
        let mut inner = self.inner.lock().await;
        let until = Instant::now() + duration;
        // Keep the longer pause if one is already pending
        if inner.backoff_until.map_or(true, |cur| until > cur) {
            inner.backoff_until = Some(until);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_basic() {
        let limiter = RateLimiter::new(100.0); // 100/sec = 10ms interval
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        // 3 requests at 100/sec should take at least ~20ms
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn test_rate_limiter_first_request_immediate() {
        let limiter = RateLimiter::new(1.0);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_rate_limiter_honors_backoff() {
        let limiter = RateLimiter::new(1000.0);
        limiter.pause_for(Duration::from_millis(60)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_rate_limiter_keeps_longer_backoff() {
        let limiter = RateLimiter::new(1000.0);
        limiter.pause_for(Duration::from_millis(60)).await;
        limiter.pause_for(Duration::from_millis(1)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
