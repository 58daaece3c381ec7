//! Implementation of the `prompt-optimizer assess` command.

use anyhow::Result;
use clap::Args;

use super::load_runtime;
use crate::cli::output::{output, CommandOutput};
use crate::cli::GlobalOptions;
use crate::domain::models::Metrics;
use crate::infrastructure::setup::build_controller;

/// Arguments of `assess`
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Prompt before optimization
    #[arg(long)]
    pub original: String,

    /// Prompt after optimization
    #[arg(long)]
    pub optimized: String,
}

/// Metrics printed by `assess`
#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct AssessOutput {
    /// Scores of the optimized prompt
    pub metrics: Metrics,
}

impl CommandOutput for AssessOutput {
    fn to_human(&self) -> String {
        [
            ("Clarity", self.metrics.clarity),
            ("Specificity", self.metrics.specificity),
            ("Structure", self.metrics.structure),
            ("Completeness", self.metrics.completeness),
        ]
        .iter()
        .map(|(label, score)| format!("{label:<13} {score:.2}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// Score the pair and print the metrics
pub async fn execute(args: AssessArgs, options: &GlobalOptions) -> Result<()> {
    let runtime = load_runtime(options)?;
    let controller = build_controller(&runtime.config)?;

    let metrics = controller
        .assess_quality(&args.original, &args.optimized)
        .await;

    output(&AssessOutput { metrics }, options.json);
    Ok(())
}
