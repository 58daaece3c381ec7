//! Common capability of the fallback tiers.

use async_trait::async_trait;

use crate::domain::error::StrategyError;
use crate::domain::models::signature::OptimizationOutputs;
use crate::domain::models::{OptimizationRequest, OptimizationResult, StrategyTag};
use crate::services::explanation::explain;

/// Outcome of one tier: a candidate result, or the reason the tier gave up.
pub type StrategyOutcome = Result<OptimizationResult, StrategyError>;

/// A tier of the fallback chain that may fail.
#[async_trait]
pub trait OptimizationStrategy: Send + Sync {
    /// Tag recorded on results from this tier
    fn tag(&self) -> StrategyTag;

    /// Produce a candidate, or the reason this tier gave up.
    async fn attempt(&self, request: &OptimizationRequest) -> StrategyOutcome;
}

/// Assemble a candidate from parsed model outputs.
pub(crate) fn candidate_from_outputs(
    tag: StrategyTag,
    request: &OptimizationRequest,
    outputs: OptimizationOutputs,
) -> OptimizationResult {
    let explanation = explain(
        &request.original_prompt,
        &outputs.optimized_prompt,
        &outputs.improvements,
    );
    OptimizationResult::new(
        tag,
        request.original_prompt.clone(),
        outputs.optimized_prompt,
        outputs.improvements,
        explanation,
    )
}
