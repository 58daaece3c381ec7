//! Single-pass optimization without demonstrations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::StrategyError;
use crate::domain::models::signature::{OptimizationInputs, OptimizationOutputs};
use crate::domain::models::{OptimizationRequest, StrategyTag, PROMPT_OPTIMIZATION};
use crate::domain::ports::{CompletionRequest, LmGateway};
use crate::services::strategy::{candidate_from_outputs, OptimizationStrategy, StrategyOutcome};

/// Asks the model once, reasoning first, for an optimized prompt.
pub struct ZeroShotOptimizer {
    gateway: Arc<dyn LmGateway>,
}

impl ZeroShotOptimizer {
    /// Optimizer calling `gateway` once per attempt
    pub fn new(gateway: Arc<dyn LmGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl OptimizationStrategy for ZeroShotOptimizer {
    fn tag(&self) -> StrategyTag {
        StrategyTag::ZeroShot
    }

    async fn attempt(&self, request: &OptimizationRequest) -> StrategyOutcome {
        let inputs = OptimizationInputs {
            purpose: request.purpose.clone(),
            original_prompt: request.original_prompt.clone(),
            examples_context: String::new(),
        };

        let completion = self
            .gateway
            .complete(CompletionRequest::new(
                &PROMPT_OPTIMIZATION,
                inputs.to_fields(),
                request.temperature,
            ))
            .await?;

        let outputs =
            OptimizationOutputs::from_fields(&completion.fields).map_err(StrategyError::InvalidOutput)?;

        Ok(candidate_from_outputs(StrategyTag::ZeroShot, request, outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::LmError;
    use crate::domain::models::signature::{FieldMap, IMPROVEMENTS, OPTIMIZED_PROMPT, REASONING};
    use crate::domain::ports::Completion;

    struct StubGateway(Result<FieldMap, LmError>);

    #[async_trait]
    impl LmGateway for StubGateway {
        async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LmError> {
            self.0.clone().map(Completion::new)
        }
    }

    fn optimizer(response: Result<FieldMap, LmError>) -> ZeroShotOptimizer {
        ZeroShotOptimizer::new(Arc::new(StubGateway(response)))
    }

    #[tokio::test]
    async fn test_zero_shot_discards_reasoning() {
        let fields = FieldMap::from([
            (REASONING.to_string(), "The original is vague.".to_string()),
            (OPTIMIZED_PROMPT.to_string(), "Explain what this function does.".to_string()),
            (IMPROVEMENTS.to_string(), "- Named the subject\n- Stated the goal".to_string()),
        ]);
        let request = OptimizationRequest::new("Explain this", "docs");

        let result = optimizer(Ok(fields)).attempt(&request).await.unwrap();

        assert_eq!(result.optimized_prompt, "Explain what this function does.");
        assert_eq!(result.improvements, vec!["Named the subject", "Stated the goal"]);
        assert_eq!(result.strategy, StrategyTag::ZeroShot);
        assert!(!result.explanation.contains("vague"));
    }

    #[tokio::test]
    async fn test_zero_shot_invalid_output() {
        let fields = FieldMap::from([(OPTIMIZED_PROMPT.to_string(), "Better".to_string())]);
        let request = OptimizationRequest::new("Explain this", "docs");

        let err = optimizer(Ok(fields)).attempt(&request).await.unwrap_err();
        assert!(matches!(err, StrategyError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_zero_shot_gateway_failure() {
        let request = OptimizationRequest::new("Explain this", "docs");
        let err = optimizer(Err(LmError::Timeout)).attempt(&request).await.unwrap_err();
        assert_eq!(err, StrategyError::Gateway(LmError::Timeout));
    }
}
