//! Messages API gateway.

use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::chat_format::{parse_completion, render_system, render_user};
use super::errors::ApiError;
use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use super::types::{Message, MessageRequest, MessageResponse};
use crate::domain::error::LmError;
use crate::domain::models::{LmConfig, RateLimitConfig, RetryConfig};
use crate::domain::ports::{Completion, CompletionRequest, LmGateway};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic gateway
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Key sent as `x-api-key`
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate per call
    pub max_tokens: u32,
    /// Sustained request rate
    pub rate_limit_rps: f64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First retry delay
    pub initial_backoff_ms: u64,
    /// Retry delay cap
    pub max_backoff_ms: u64,
    /// Budget for one gateway call, retries included
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    /// Build from the loaded config sections
    pub fn from_sections(
        api_key: String,
        lm: &LmConfig,
        rate_limit: &RateLimitConfig,
        retry: &RetryConfig,
    ) -> Self {
        Self {
            api_key,
            base_url: lm.base_url.trim_end_matches('/').to_string(),
            model: lm.model.clone(),
            max_tokens: lm.max_tokens,
            rate_limit_rps: rate_limit.requests_per_second,
            max_retries: retry.max_retries,
            initial_backoff_ms: retry.initial_backoff_ms,
            max_backoff_ms: retry.max_backoff_ms,
            timeout_secs: lm.timeout_secs,
        }
    }
}

/// [`LmGateway`] backed by the Anthropic Messages API
///
/// Each call renders the signature into a chat prompt, waits for a
/// rate-limit token, posts with exponential-backoff retry, and parses the
/// marker-delimited answer back into output fields. The whole call is
/// bounded by `timeout_secs`.
pub struct AnthropicGateway {
    http_client: ReqwestClient,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
}

impl AnthropicGateway {
    /// Build the HTTP client. Fails when the API key is not a valid header value.
    pub fn new(config: AnthropicConfig) -> Result<Self, ApiError> {
        info!(
            base_url = %config.base_url,
            model = %config.model,
            rate_limit_rps = config.rate_limit_rps,
            timeout_secs = config.timeout_secs,
            api_key = %redact(&config.api_key),
            "Initializing Anthropic gateway"
        );

        let mut headers = header::HeaderMap::new();
        let mut api_key = header::HeaderValue::from_str(&config.api_key)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let timeout = Duration::from_secs(config.timeout_secs);
        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            model: config.model,
            max_tokens: config.max_tokens,
            timeout,
            rate_limiter: TokenBucketRateLimiter::new(config.rate_limit_rps),
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> MessageRequest {
        MessageRequest {
            model: self.model.clone(),
            messages: vec![Message::user(render_user(
                request.signature,
                &request.inputs,
            ))],
            max_tokens: self.max_tokens,
            system: Some(render_system(request.signature)),
            temperature: Some(request.temperature.clamp(0.0, 1.0)),
        }
    }

    /// Rate-limited, retried round trip.
    async fn send_message(&self, request: &MessageRequest) -> Result<MessageResponse, ApiError> {
        self.retry_policy
            .execute(|| async {
                self.rate_limiter.acquire().await;
                self.execute_message_request(request).await
            })
            .await
    }

    async fn execute_message_request(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {}", url);

        let response = self.http_client.post(&url).json(request).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> Result<MessageResponse, ApiError> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn handle_error_response(response: Response) -> ApiError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        warn!(status = %status, body = %body, "API error");

        match status {
            StatusCode::BAD_REQUEST => ApiError::InvalidRequest(body),
            StatusCode::UNAUTHORIZED => ApiError::InvalidApiKey,
            StatusCode::FORBIDDEN => ApiError::Forbidden(body),
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimitExceeded,
            // Includes 529 overloaded
            status if status.is_server_error() => ApiError::ServerError(status, body),
            _ => ApiError::UnknownError(status, body),
        }
    }
}

#[async_trait]
impl LmGateway for AnthropicGateway {
    #[instrument(skip(self, request), fields(signature = request.signature.name, model = %self.model, temperature = request.temperature))]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LmError> {
        let message = self.build_request(&request);

        let response = match tokio::time::timeout(self.timeout, self.send_message(&message)).await
        {
            Ok(result) => result.map_err(LmError::from)?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "LM call timed out");
                return Err(LmError::Timeout);
            }
        };

        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );

        let fields = parse_completion(request.signature, &response.text())
            .map_err(|reason| LmError::from(ApiError::MalformedCompletion(reason)))?;
        Ok(Completion::new(fields))
    }
}

/// Key prefix safe for logs.
fn redact(api_key: &str) -> String {
    match api_key.get(..8) {
        Some(prefix) if api_key.len() > 8 => format!("{prefix}...[REDACTED]"),
        _ => "[REDACTED]".to_string(),
    }
}
