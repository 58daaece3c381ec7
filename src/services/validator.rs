//! Hard and soft constraints on candidate results.
//!
//! Hard constraints decide whether a tier's candidate is usable at all. Soft
//! constraints never reject; they are logged and recorded on the result's
//! diagnostics.

use std::fmt;

use crate::domain::error::StrategyError;
use crate::domain::models::OptimizationResult;
use crate::services::strategy::StrategyOutcome;

/// Markers whose presence signals a structured prompt.
const STRUCTURE_MARKERS: [&str; 8] = ["\n", ":", "-", "1.", "2.", "Step", "must", "should"];

/// Must-hold invariant of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardConstraint {
    /// `optimized_prompt` must not be blank
    NonEmptyOptimizedPrompt,
    /// At least one non-blank improvement
    NonEmptyImprovements,
}

impl fmt::Display for HardConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEmptyOptimizedPrompt => f.write_str("optimized prompt cannot be empty"),
            Self::NonEmptyImprovements => f.write_str("improvements cannot be empty"),
        }
    }
}

/// Should-hold preference of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftConstraint {
    /// Optimized prompt equals the original
    DiffersFromOriginal,
    /// Fewer than two improvements
    MultipleImprovements,
    /// Under half the words of the original
    ReasonableLength,
}

impl fmt::Display for SoftConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiffersFromOriginal => f.write_str("optimized prompt should differ from original"),
            Self::MultipleImprovements => f.write_str("at least 2 improvements should be listed"),
            Self::ReasonableLength => {
                f.write_str("optimized prompt should keep at least half the original word count")
            }
        }
    }
}

/// Verdict on a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Passed every hard constraint
    Valid(OptimizationResult),
    /// Rejected
    Invalid {
        /// First hard constraint the candidate broke
        violated: HardConstraint,
    },
}

impl Validation {
    /// Map into a strategy outcome; invalid results become `ValidationFailure`.
    pub fn into_outcome(self) -> StrategyOutcome {
        match self {
            Self::Valid(result) => Ok(result),
            Self::Invalid { violated } => Err(StrategyError::ValidationFailure(violated.to_string())),
        }
    }
}

/// Check hard constraints, then record soft violations on a valid candidate.
pub fn validate(candidate: OptimizationResult) -> Validation {
    if let Some(violated) = hard_violation(&candidate) {
        return Validation::Invalid { violated };
    }
    Validation::Valid(annotate(candidate))
}

/// Record soft-constraint violations without judging hard ones.
pub fn annotate(mut result: OptimizationResult) -> OptimizationResult {
    for violation in soft_violations(&result) {
        tracing::warn!(
            strategy = %result.strategy,
            constraint = %violation,
            "Soft constraint violated"
        );
        result.diagnostics.push(violation.to_string());
    }
    result
}

/// First hard constraint the result breaks, if any
pub fn hard_violation(result: &OptimizationResult) -> Option<HardConstraint> {
    if result.optimized_prompt.trim().is_empty() {
        return Some(HardConstraint::NonEmptyOptimizedPrompt);
    }
    if !result.improvements.iter().any(|item| !item.trim().is_empty()) {
        return Some(HardConstraint::NonEmptyImprovements);
    }
    None
}

/// Every soft constraint the result breaks
pub fn soft_violations(result: &OptimizationResult) -> Vec<SoftConstraint> {
    let mut violations = Vec::new();

    if result.optimized_prompt.trim() == result.original_prompt.trim() {
        violations.push(SoftConstraint::DiffersFromOriginal);
    }
    if result.improvements.len() < 2 {
        violations.push(SoftConstraint::MultipleImprovements);
    }

    let original_words = word_count(&result.original_prompt);
    let optimized_words = word_count(&result.optimized_prompt);
    if (optimized_words as f64) < original_words as f64 * 0.5 {
        violations.push(SoftConstraint::ReasonableLength);
    }

    violations
}

/// Score in [0, 1] of how much an optimized prompt improves on the original.
///
/// Rewards a changed prompt, a moderate growth in word count, and structure
/// markers. Few-shot trial selection ranks by this score.
pub fn optimization_score(original: &str, optimized: &str) -> f64 {
    if optimized.trim().is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    if optimized.trim() != original.trim() {
        score += 0.3;
    }

    let ratio = word_count(optimized) as f64 / word_count(original).max(1) as f64;
    if (1.0..=2.5).contains(&ratio) {
        score += 0.3;
    } else if (0.8..1.0).contains(&ratio) {
        score += 0.2;
    }

    let markers = STRUCTURE_MARKERS
        .iter()
        .filter(|marker| optimized.contains(*marker))
        .count();
    score += (markers as f64 * 0.05).min(0.4);

    score.min(1.0)
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
