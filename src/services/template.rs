//! Deterministic last-resort tier.

use crate::domain::models::{OptimizationRequest, OptimizationResult, StrategyTag};
use crate::services::explanation::TEMPLATE_EXPLANATION;

const TEMPLATE_IMPROVEMENTS: [&str; 4] = [
    "Added clear task definition",
    "Structured the instructions for clarity",
    "Specified output requirements",
    "Included guidance for quality response",
];

/// Wraps the original prompt in a fixed structure framed by the purpose.
///
/// Never fails and makes no gateway calls; identical inputs always produce
/// identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateOptimizer;

impl TemplateOptimizer {
    /// The template tier has no state
    pub fn new() -> Self {
        Self
    }

    /// Wrap the original prompt in the fixed template.
    pub fn apply(&self, request: &OptimizationRequest) -> OptimizationResult {
        let optimized = format!(
            "Task: {purpose}\n\n\
             Instructions:\n{original}\n\n\
             Please provide a detailed response that:\n\
             1. Directly addresses the stated purpose\n\
             2. Is clear and well-structured\n\
             3. Includes specific examples where relevant\n\
             4. Follows best practices for the given task\n\n\
             Output:",
            purpose = request.purpose.trim(),
            original = request.original_prompt.trim(),
        );

        OptimizationResult::new(
            StrategyTag::Template,
            request.original_prompt.clone(),
            optimized,
            TEMPLATE_IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
            TEMPLATE_EXPLANATION,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_frames_purpose() {
        let request = OptimizationRequest::new("Explain this", "generate documentation");
        let result = TemplateOptimizer::new().apply(&request);

        assert!(result
            .optimized_prompt
            .starts_with("Task: generate documentation\n\nInstructions:\nExplain this\n"));
        assert!(result.optimized_prompt.ends_with("Output:"));
        assert_eq!(result.improvements.len(), 4);
        assert_eq!(result.strategy, StrategyTag::Template);
        assert_eq!(result.original_prompt, "Explain this");
        assert_eq!(result.explanation, TEMPLATE_EXPLANATION);
    }

    #[test]
    fn test_template_is_deterministic() {
        let request = OptimizationRequest::new("Summarize", "news digest");
        let template = TemplateOptimizer::new();
        assert_eq!(template.apply(&request), template.apply(&request));
    }
}
