//! Command implementations.

pub mod assess;
pub mod init;
pub mod optimize;

use anyhow::{Context, Result};

use crate::cli::GlobalOptions;
use crate::domain::models::{Config, LmProvider};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;

/// Loaded configuration plus the logger guard that must outlive the command
pub struct Runtime {
    /// Effective configuration
    pub config: Config,
    _logger: LoggerImpl,
}

/// Load configuration and install logging for a command that talks to the pipeline.
pub fn load_runtime(options: &GlobalOptions) -> Result<Runtime> {
    let mut config = match options.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    if options.offline {
        config.lm.provider = LmProvider::Offline;
    }

    let logger = LoggerImpl::init(&config.logging)?;
    tracing::debug!(provider = ?config.lm.provider, model = %config.lm.model, "Configuration loaded");

    Ok(Runtime {
        config,
        _logger: logger,
    })
}
