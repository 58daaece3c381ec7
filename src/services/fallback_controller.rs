//! Orchestration of the optimization tiers.
//!
//! A request runs few-shot (when it carries usable examples), then
//! zero-shot, then the template, stopping at the first tier whose candidate
//! passes validation. Metrics are attached last. The template tier cannot
//! fail, so `optimize` only rejects malformed input.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::RequestError;
use crate::domain::models::{Metrics, OptimizationRequest, OptimizationResult, OptimizerConfig};
use crate::domain::ports::LmGateway;
use crate::services::few_shot::FewShotCompiler;
use crate::services::metrics_assessor::MetricsAssessor;
use crate::services::quality_heuristics::heuristic_metrics;
use crate::services::strategy::OptimizationStrategy;
use crate::services::template::TemplateOptimizer;
use crate::services::validator;
use crate::services::zero_shot::ZeroShotOptimizer;

/// Runs a request through the strategy tiers and attaches metrics.
pub struct FallbackController {
    few_shot: FewShotCompiler,
    zero_shot: ZeroShotOptimizer,
    template: TemplateOptimizer,
    assessor: MetricsAssessor,
    config: OptimizerConfig,
}

impl FallbackController {
    /// Build every tier on the same gateway.
    pub fn new(gateway: Arc<dyn LmGateway>, config: OptimizerConfig) -> Self {
        Self {
            few_shot: FewShotCompiler::new(Arc::clone(&gateway), &config),
            zero_shot: ZeroShotOptimizer::new(Arc::clone(&gateway)),
            template: TemplateOptimizer::new(),
            assessor: MetricsAssessor::new(gateway, config.judgment_prompt_chars),
            config,
        }
    }

    /// Optimize a prompt, degrading tier by tier instead of failing.
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), examples = request.usable_examples().count()))]
    pub async fn optimize(
        &self,
        request: OptimizationRequest,
    ) -> Result<OptimizationResult, RequestError> {
        request.validate()?;
        let deadline = self.deadline();

        let mut result = match tokio::time::timeout_at(deadline, self.run_tiers(&request)).await {
            Ok(Some(result)) => result,
            Ok(None) => self.apply_template(&request),
            Err(_) => {
                tracing::warn!(
                    budget_secs = self.config.pipeline_budget_secs,
                    "Pipeline budget exhausted, using template"
                );
                self.apply_template(&request)
            }
        };

        if self.config.assess_metrics {
            let metrics = self
                .assess_until(
                    deadline,
                    &result.original_prompt,
                    &result.optimized_prompt,
                    Some(&request.purpose),
                )
                .await;
            result.metrics = Some(metrics);
        }

        tracing::info!(
            strategy = %result.strategy,
            improvements = result.improvements.len(),
            diagnostics = result.diagnostics.len(),
            "Optimization complete"
        );
        Ok(result)
    }

    /// Score a prompt pair on its own. Never fails.
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn assess_quality(&self, original: &str, optimized: &str) -> Metrics {
        self.assess_until(self.deadline(), original, optimized, None)
            .await
    }

    /// Tiers to try for this request, in order.
    fn tiers(&self, request: &OptimizationRequest) -> Vec<&dyn OptimizationStrategy> {
        let mut tiers: Vec<&dyn OptimizationStrategy> = Vec::with_capacity(2);
        if request.has_usable_examples() {
            tiers.push(&self.few_shot);
        }
        tiers.push(&self.zero_shot);
        tiers
    }

    async fn run_tiers(&self, request: &OptimizationRequest) -> Option<OptimizationResult> {
        for strategy in self.tiers(request) {
            let outcome = strategy
                .attempt(request)
                .await
                .and_then(|candidate| validator::validate(candidate).into_outcome());

            match outcome {
                Ok(result) => {
                    tracing::debug!(strategy = %strategy.tag(), "Strategy succeeded");
                    return Some(result);
                }
                Err(e) => {
                    tracing::warn!(strategy = %strategy.tag(), error = %e, "Strategy failed, falling through");
                }
            }
        }
        None
    }

    fn apply_template(&self, request: &OptimizationRequest) -> OptimizationResult {
        validator::annotate(self.template.apply(request))
    }

    async fn assess_until(
        &self,
        deadline: Instant,
        original: &str,
        optimized: &str,
        purpose: Option<&str>,
    ) -> Metrics {
        match tokio::time::timeout_at(deadline, self.assessor.assess(original, optimized, purpose))
            .await
        {
            Ok(metrics) => metrics,
            Err(_) => {
                tracing::warn!("Pipeline budget exhausted, using heuristic metrics");
                heuristic_metrics(optimized, purpose)
            }
        }
    }

    fn deadline(&self) -> Instant {
        Instant::now() + Duration::from_secs(self.config.pipeline_budget_secs)
    }
}
