//! Anthropic Messages API gateway
//!
//! Provides the production [`LmGateway`](crate::domain::ports::LmGateway):
//! - Chat-style rendering of signature contracts
//! - Token bucket rate limiting
//! - Exponential backoff retry for transient errors
//! - Per-call timeout

pub mod chat_format;
pub mod client;
pub mod errors;
pub mod rate_limiter;
pub mod retry;
pub mod types;

pub use client::{AnthropicConfig, AnthropicGateway};
pub use errors::ApiError;
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
