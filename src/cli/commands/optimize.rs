//! Implementation of the `prompt-optimizer optimize` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use super::load_runtime;
use crate::cli::output::{output, CommandOutput};
use crate::cli::GlobalOptions;
use crate::domain::models::{OptimizationRequest, OptimizationResult};
use crate::infrastructure::setup::build_controller;

/// Arguments of `optimize`
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// JSON request file; reads stdin when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl CommandOutput for OptimizationResult {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Strategy: {}", self.strategy),
            String::new(),
            "Optimized prompt:".to_string(),
            self.optimized_prompt.clone(),
            String::new(),
            "Improvements:".to_string(),
        ];
        lines.extend(self.improvements.iter().map(|item| format!("  - {item}")));
        lines.push(String::new());
        lines.push(format!("Explanation: {}", self.explanation));

        if let Some(ref metrics) = self.metrics {
            lines.push(String::new());
            lines.push(format!(
                "Metrics: clarity {:.2}, specificity {:.2}, structure {:.2}, completeness {:.2}",
                metrics.clarity, metrics.specificity, metrics.structure, metrics.completeness
            ));
        }
        if !self.diagnostics.is_empty() {
            lines.push(String::new());
            lines.push("Warnings:".to_string());
            lines.extend(self.diagnostics.iter().map(|note| format!("  - {note}")));
        }
        lines.join("\n")
    }
}

/// Parse a request body, naming its source on failure.
pub fn parse_request(body: &str, source: &str) -> Result<OptimizationRequest> {
    serde_json::from_str(body).with_context(|| format!("Invalid optimization request in {source}"))
}

async fn read_request(input: Option<&PathBuf>) -> Result<OptimizationRequest> {
    match input {
        Some(path) => {
            let body = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_request(&body, &path.display().to_string())
        }
        None => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .context("Failed to read request from stdin")?;
            parse_request(&body, "stdin")
        }
    }
}

/// Read a request, optimize it, and print the result
pub async fn execute(args: OptimizeArgs, options: &GlobalOptions) -> Result<()> {
    let runtime = load_runtime(options)?;
    let request = read_request(args.input.as_ref()).await?;
    let controller = build_controller(&runtime.config)?;

    let result = tokio::select! {
        result = controller.optimize(request) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning optimization");
            anyhow::bail!("Optimization cancelled");
        }
    };

    output(&result, options.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Metrics, StrategyTag};

    #[test]
    fn test_parse_request_reports_source() {
        let err = parse_request("{\"purpose\": \"docs\"}", "request.json").unwrap_err();
        assert!(err.to_string().contains("request.json"));
    }

    #[test]
    fn test_parse_request_defaults_temperature() {
        let request =
            parse_request(r#"{"original_prompt": "Explain this", "purpose": "docs"}"#, "stdin")
                .unwrap();
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!(request.examples.is_none());
    }

    #[test]
    fn test_human_output_lists_improvements_and_metrics() {
        let mut result = OptimizationResult::new(
            StrategyTag::ZeroShot,
            "Explain this",
            "Explain what this function does",
            vec!["Named the subject".to_string()],
            "Clarified the request",
        );
        result.metrics = Some(Metrics::new(0.8, 0.6, 0.5, 0.7));

        let human = result.to_human();
        assert!(human.contains("Strategy: zero_shot"));
        assert!(human.contains("  - Named the subject"));
        assert!(human.contains("clarity 0.80"));

        let json = result.to_json();
        assert_eq!(json["metrics"]["clarity_score"], 0.8);
        assert!(json.get("strategy").is_none());
    }
}
