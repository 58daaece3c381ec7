//! Property tests for scoring and pipeline termination.

mod common;

use std::sync::Arc;

use common::FailingGateway;
use prompt_optimizer::domain::models::result::normalize_score;
use prompt_optimizer::services::metrics_assessor::parse_score;
use prompt_optimizer::services::{heuristic_metrics, optimization_score};
use prompt_optimizer::{
    FallbackController, LmError, OptimizationRequest, OptimizerConfig, StrategyTag,
};
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// Property: heuristic metrics stay within [0, 1] for any text
    #[test]
    fn prop_heuristics_in_range(prompt in ".{0,400}", purpose in proptest::option::of(".{0,80}")) {
        let metrics = heuristic_metrics(&prompt, purpose.as_deref());
        prop_assert!(metrics.is_within_range(), "{metrics:?}");
    }

    /// Property: judgment score parsing never leaves [0, 1]
    #[test]
    fn prop_parsed_scores_in_range(text in ".{0,40}") {
        if let Some(score) = parse_score(&text) {
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    /// Property: normalization is idempotent and bounded
    #[test]
    fn prop_normalize_idempotent(value in proptest::num::f64::ANY) {
        let once = normalize_score(value);
        prop_assert!((0.0..=1.0).contains(&once));
        prop_assert_eq!(normalize_score(once), once);
    }

    /// Property: trial scores are bounded and zero only for blank output
    #[test]
    fn prop_optimization_score_bounded(original in ".{1,200}", optimized in ".{0,400}") {
        let score = optimization_score(&original, &optimized);
        prop_assert!((0.0..=1.0).contains(&score));
        if optimized.trim().is_empty() {
            prop_assert_eq!(score, 0.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: a valid request always yields a non-empty result, even with no backend
    #[test]
    fn prop_optimize_always_answers(
        original in "[a-zA-Z][a-zA-Z ,.?]{0,120}",
        purpose in "[a-zA-Z][a-zA-Z ]{0,40}",
        temperature in 0.0f32..=1.0,
    ) {
        let controller = FallbackController::new(
            Arc::new(FailingGateway(LmError::Timeout)),
            OptimizerConfig::default(),
        );
        let request = OptimizationRequest::new(original.clone(), purpose).with_temperature(temperature);

        let result = runtime().block_on(controller.optimize(request)).unwrap();

        prop_assert_eq!(result.strategy, StrategyTag::Template);
        prop_assert_eq!(result.original_prompt, original);
        prop_assert!(!result.optimized_prompt.trim().is_empty());
        prop_assert!(!result.improvements.is_empty());
        prop_assert!(result.metrics.is_some_and(|m| m.is_within_range()));
    }
}
