//! Configuration sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the prompt optimizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// LM backend configuration
    #[serde(default)]
    pub lm: LmConfig,

    /// Optimization pipeline configuration
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Which LM backend serves gateway calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LmProvider {
    /// Anthropic Messages API
    #[default]
    Anthropic,
    /// No backend; every call fails and the pipeline degrades to heuristics
    Offline,
}

/// LM backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LmConfig {
    /// Backend to call
    #[serde(default)]
    pub provider: LmProvider,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the API (for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; falls back to `ANTHROPIC_API_KEY` when empty
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum tokens to generate per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Timeout for a single gateway call, retries included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

const fn default_max_tokens() -> u32 {
    2048
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            provider: LmProvider::default(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LmConfig {
    /// Configured key, or `ANTHROPIC_API_KEY` from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Optimization pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    /// Demonstration cap for the few-shot tier (3-5)
    #[serde(default = "default_max_demos")]
    pub max_demos: usize,

    /// Trial completions per few-shot compilation
    #[serde(default = "default_num_trials")]
    pub num_trials: usize,

    /// Minimum optimization score a few-shot trial needs to be accepted
    #[serde(default = "default_min_acceptance_score")]
    pub min_acceptance_score: f64,

    /// Wall-clock budget for one request, all tiers included
    #[serde(default = "default_pipeline_budget_secs")]
    pub pipeline_budget_secs: u64,

    /// Whether results carry quality metrics
    #[serde(default = "default_true")]
    pub assess_metrics: bool,

    /// Characters of each prompt sent to the judgment call
    #[serde(default = "default_judgment_prompt_chars")]
    pub judgment_prompt_chars: usize,
}

const fn default_max_demos() -> usize {
    5
}

const fn default_num_trials() -> usize {
    3
}

const fn default_min_acceptance_score() -> f64 {
    0.3
}

const fn default_pipeline_budget_secs() -> u64 {
    180
}

const fn default_true() -> bool {
    true
}

const fn default_judgment_prompt_chars() -> usize {
    500
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_demos: default_max_demos(),
            num_trials: default_num_trials(),
            min_acceptance_score: default_min_acceptance_score(),
            pipeline_budget_secs: default_pipeline_budget_secs(),
            assess_metrics: default_true(),
            judgment_prompt_chars: default_judgment_prompt_chars(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable text
    Pretty,
}

/// Rotation policy for file logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// New file every day
    #[default]
    Daily,
    /// New file every hour
    Hourly,
    /// Single file, never rotated
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directory for log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
}

const fn default_requests_per_second() -> f64 {
    5.0
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    20_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let config = LmConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        temp_env::with_var("ANTHROPIC_API_KEY", Some("from-env"), || {
            assert_eq!(config.resolve_api_key().as_deref(), Some("from-config"));
        });
    }

    #[test]
    fn test_resolve_api_key_falls_back_to_env() {
        let config = LmConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        temp_env::with_var("ANTHROPIC_API_KEY", Some("from-env"), || {
            assert_eq!(config.resolve_api_key().as_deref(), Some("from-env"));
        });
        temp_env::with_var_unset("ANTHROPIC_API_KEY", || {
            assert_eq!(config.resolve_api_key(), None);
        });
    }

    #[test]
    fn test_provider_parsing() {
        let config: LmConfig = serde_yaml::from_str("provider: offline").unwrap();
        assert_eq!(config.provider, LmProvider::Offline);
        assert_eq!(config.timeout_secs, 60);
    }
}
