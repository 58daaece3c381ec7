//! Project initialization and service wiring
//!
//! Handles:
//! - Configuration directory and default config file creation
//! - Choosing the LM gateway for a loaded config
//! - Assembling the fallback controller

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::models::config::{Config, LmProvider};
use crate::domain::ports::{LmGateway, OfflineGateway};
use crate::infrastructure::anthropic::{AnthropicConfig, AnthropicGateway};
use crate::infrastructure::config::loader::CONFIG_DIR;
use crate::services::FallbackController;

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Prompt optimizer configuration
# Override settings by editing this file, adding .prompt-optimizer/local.yaml,
# or setting environment variables with the PROMPT_OPTIMIZER_ prefix
#
# Example environment variables:
#   export PROMPT_OPTIMIZER_LM__MODEL=claude-haiku-4-5
#   export PROMPT_OPTIMIZER_OPTIMIZER__NUM_TRIALS=5
#   export PROMPT_OPTIMIZER_LOGGING__LEVEL=debug

# Language model backend
lm:
  # anthropic or offline (offline uses the template tier and heuristics only)
  provider: "anthropic"
  model: "claude-sonnet-4-5-20250929"
  base_url: "https://api.anthropic.com"
  # Leave unset to read ANTHROPIC_API_KEY
  # api_key: "sk-ant-..."
  max_tokens: 2048
  # Seconds allowed for one call, retries included
  timeout_secs: 60

# Optimization pipeline
optimizer:
  # Demonstrations used by the few-shot tier (3-5)
  max_demos: 5
  # Trial completions per few-shot compilation
  num_trials: 3
  # Minimum trial score accepted by the few-shot tier (0.0-1.0)
  min_acceptance_score: 0.3
  # Wall-clock budget for one request
  pipeline_budget_secs: 180
  # Attach quality metrics to results
  assess_metrics: true
  # Characters of each prompt sent to the judgment call
  judgment_prompt_chars: 500

# Logging configuration
logging:
  # Log level: trace, debug, info, warn, error
  level: "info"
  # Log format: json, pretty
  format: "pretty"
  # Uncomment to also write rolling JSON log files
  # log_dir: ".prompt-optimizer/logs"
  rotation: "daily"

# API rate limiting
rate_limit:
  requests_per_second: 5.0

# Retry policy for transient failures
retry:
  max_retries: 2
  initial_backoff_ms: 1000
  max_backoff_ms: 20000
"#;

/// Setup paths and directories
pub struct SetupPaths {
    /// Project `.prompt-optimizer` directory
    pub config_dir: PathBuf,
    /// Main config file inside `config_dir`
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::for_dir(current_dir))
    }

    /// Setup paths rooted at `project_dir`
    pub fn for_dir(project_dir: impl AsRef<Path>) -> Self {
        let config_dir = project_dir.as_ref().join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }

    /// Whether `config.yaml` already exists
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")
}

/// Write the default configuration file; an existing file is kept unless `force`
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE)
        .context("Failed to write config file")?;
    Ok(true)
}

/// Pick the gateway for this config.
///
/// The anthropic provider without an API key degrades to the offline gateway
/// with a warning, so the pipeline still answers from the template tier.
pub fn build_gateway(config: &Config) -> Result<Arc<dyn LmGateway>> {
    if config.lm.provider == LmProvider::Offline {
        tracing::info!("Using offline gateway");
        return Ok(Arc::new(OfflineGateway::new()));
    }

    let Some(api_key) = config.lm.resolve_api_key() else {
        tracing::warn!("No Anthropic API key configured, falling back to offline gateway");
        return Ok(Arc::new(OfflineGateway::new()));
    };

    let gateway = AnthropicGateway::new(AnthropicConfig::from_sections(
        api_key,
        &config.lm,
        &config.rate_limit,
        &config.retry,
    ))
    .context("Failed to build Anthropic gateway")?;
    Ok(Arc::new(gateway))
}

/// Wire the controller to the configured gateway
pub fn build_controller(config: &Config) -> Result<FallbackController> {
    let gateway = build_gateway(config)?;
    Ok(FallbackController::new(gateway, config.optimizer.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_is_valid_config() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        ConfigLoader::validate(&config).unwrap();
        assert_eq!(config.optimizer.max_demos, 5);
    }

    #[test]
    fn test_create_config_file_respects_force() {
        let dir = TempDir::new().unwrap();
        let paths = SetupPaths::for_dir(dir.path());
        assert!(!paths.is_initialized());

        create_config_dir(&paths).unwrap();
        assert!(create_config_file(&paths, false).unwrap());
        assert!(paths.is_initialized());

        fs::write(&paths.config_file, "lm:\n  provider: offline\n").unwrap();
        assert!(!create_config_file(&paths, false).unwrap());
        assert!(fs::read_to_string(&paths.config_file)
            .unwrap()
            .contains("offline"));

        assert!(create_config_file(&paths, true).unwrap());
        assert!(fs::read_to_string(&paths.config_file)
            .unwrap()
            .contains("judgment_prompt_chars"));
    }

    #[tokio::test]
    async fn test_missing_api_key_falls_back_to_offline() {
        let config = Config::default();
        let gateway = temp_env::with_var_unset("ANTHROPIC_API_KEY", || build_gateway(&config))
            .unwrap();

        let request = crate::domain::ports::CompletionRequest::new(
            &crate::domain::models::PROMPT_OPTIMIZATION,
            Default::default(),
            0.5,
        );
        assert!(gateway.complete(request).await.is_err());
    }

    #[test]
    fn test_anthropic_gateway_with_key() {
        let mut config = Config::default();
        config.lm.api_key = Some("sk-ant-test".to_string());
        assert!(build_gateway(&config).is_ok());
    }
}
