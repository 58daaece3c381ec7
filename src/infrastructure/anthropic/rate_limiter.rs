//! Token bucket rate limiter.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Token bucket rate limiter for Messages API calls
///
/// Tokens refill continuously at the configured rate; the bucket holds at
/// most one second's worth so short bursts are allowed.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    /// Current number of available tokens
    tokens: Arc<Mutex<f64>>,
    /// Maximum token capacity
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
    /// Last time tokens were refilled
    last_refill: Arc<Mutex<Instant>>,
}

impl TokenBucketRateLimiter {
    /// Create a limiter allowing `requests_per_second` sustained calls.
    ///
    /// Non-positive or non-finite rates fall back to one request per second;
    /// the config loader rejects them before they get here.
    pub fn new(requests_per_second: f64) -> Self {
        let rate = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            requests_per_second
        } else {
            1.0
        };
        let capacity = rate.max(1.0);

        Self {
            tokens: Arc::new(Mutex::new(capacity)),
            capacity,
            refill_rate: rate,
            last_refill: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&self) {
        loop {
            let mut tokens = self.tokens.lock().await;
            let mut last_refill = self.last_refill.lock().await;

            let now = Instant::now();
            let elapsed = now.duration_since(*last_refill).as_secs_f64();
            let available = (*tokens + elapsed * self.refill_rate).min(self.capacity);

            if available >= 1.0 {
                *tokens = available - 1.0;
                *last_refill = now;
                return;
            }

            let wait = Duration::from_secs_f64(((1.0 - available) / self.refill_rate).max(0.01));

            // Release locks before sleeping
            drop(tokens);
            drop(last_refill);

            sleep(wait).await;
        }
    }

    #[cfg(test)]
    pub async fn available_tokens(&self) -> f64 {
        let tokens = self.tokens.lock().await;
        let last_refill = self.last_refill.lock().await;

        let elapsed = Instant::now().duration_since(*last_refill).as_secs_f64();
        (*tokens + elapsed * self.refill_rate).min(self.capacity)
    }
}
