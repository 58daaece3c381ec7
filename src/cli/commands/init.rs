//! Implementation of the `prompt-optimizer init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::{create_config_dir, create_config_file, SetupPaths};

/// Arguments of `init`
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Outcome of `init`
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// False when an existing config was kept
    pub success: bool,
    /// Summary for the user
    pub message: String,
    /// Path of the config file
    pub config_file: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        if self.success {
            format!("{}\n  - {}", self.message, self.config_file.display())
        } else {
            self.message.clone()
        }
    }
}

/// Create the config directory and default config file
pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let paths = SetupPaths::for_dir(&target_path);
    create_config_dir(&paths)?;
    let written = create_config_file(&paths, args.force)?;

    let message = if written {
        "Initialized prompt optimizer configuration".to_string()
    } else {
        "Project already initialized. Use --force to overwrite config.yaml.".to_string()
    };

    output(
        &InitOutput {
            success: written,
            message,
            config_file: paths.config_file,
        },
        json_mode,
    );
    Ok(())
}
