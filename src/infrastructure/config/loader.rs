//! Figment-based configuration loader and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::services::MAX_DEMONSTRATIONS;

/// Project directory holding config files
pub const CONFIG_DIR: &str = ".prompt-optimizer";

/// Prefix of environment overrides, e.g. `PROMPT_OPTIMIZER_LM__MODEL`
pub const ENV_PREFIX: &str = "PROMPT_OPTIMIZER_";

/// Fewest demonstrations a few-shot compilation may be configured with
const MIN_DEMONSTRATIONS: usize = 3;

/// Configuration error types
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Requests per second not positive and finite
    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    /// Unknown log level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    /// Initial backoff exceeds the maximum
    InvalidBackoff(u64, u64),

    /// Demonstration count outside 3..=5
    #[error("Invalid max_demos: {0}. Must be between 3 and 5")]
    InvalidMaxDemos(usize),

    /// No trials configured
    #[error("Invalid num_trials: {0}. Must be at least 1")]
    InvalidNumTrials(usize),

    /// Acceptance score outside [0, 1]
    #[error("Invalid min_acceptance_score: {0}. Must be within [0.0, 1.0]")]
    InvalidAcceptanceScore(f64),

    /// A setting that must be positive is zero
    #[error("Invalid {0}: must be greater than 0")]
    ZeroValue(&'static str),

    /// Any other invalid setting
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .prompt-optimizer/config.yaml
    /// 3. .prompt-optimizer/local.yaml (optional overrides)
    /// 4. Environment variables (PROMPT_OPTIMIZER_* prefix, `__` nests)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`load`](Self::load), rooted at `project_dir`.
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Config> {
        let dir = project_dir.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let rps = config.rate_limit.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(rps));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.lm.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "lm.model cannot be empty".to_string(),
            ));
        }
        if config.lm.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "lm.base_url cannot be empty".to_string(),
            ));
        }
        if config.lm.max_tokens == 0 {
            return Err(ConfigError::ZeroValue("lm.max_tokens"));
        }
        if config.lm.timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("lm.timeout_secs"));
        }

        let optimizer = &config.optimizer;
        if !(MIN_DEMONSTRATIONS..=MAX_DEMONSTRATIONS).contains(&optimizer.max_demos) {
            return Err(ConfigError::InvalidMaxDemos(optimizer.max_demos));
        }
        if optimizer.num_trials == 0 {
            return Err(ConfigError::InvalidNumTrials(optimizer.num_trials));
        }
        if !(0.0..=1.0).contains(&optimizer.min_acceptance_score) {
            return Err(ConfigError::InvalidAcceptanceScore(
                optimizer.min_acceptance_score,
            ));
        }
        if optimizer.pipeline_budget_secs == 0 {
            return Err(ConfigError::ZeroValue("optimizer.pipeline_budget_secs"));
        }
        if optimizer.judgment_prompt_chars == 0 {
            return Err(ConfigError::ZeroValue("optimizer.judgment_prompt_chars"));
        }

        Ok(())
    }
}
