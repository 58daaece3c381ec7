//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{assess::AssessArgs, init::InitArgs, optimize::OptimizeArgs};

/// Top-level command line
#[derive(Parser)]
#[command(name = "prompt-optimizer")]
#[command(about = "Optimize prompts for a stated purpose with LM-backed fallback tiers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to use instead of .prompt-optimizer/ discovery
    #[arg(short, long, global = true, env = "PROMPT_OPTIMIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Never call the LM backend; template tier and heuristic metrics only
    #[arg(long, global = true)]
    pub offline: bool,
}

impl Cli {
    /// Flags shared by every command
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            offline: self.offline,
            json: self.json,
        }
    }
}

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file override
    pub config: Option<PathBuf>,
    /// Force the offline gateway
    pub offline: bool,
    /// Print JSON instead of text
    pub json: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create .prompt-optimizer/config.yaml with documented defaults
    Init(InitArgs),

    /// Optimize a prompt from a JSON request
    Optimize(OptimizeArgs),

    /// Score an original/optimized prompt pair
    Assess(AssessArgs),
}
