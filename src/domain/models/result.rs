//! Optimization result and quality metrics.

use serde::{Deserialize, Serialize};

/// Quality scores for a prompt, each within [0.0, 1.0].
///
/// Serialized with the `*_score` names expected by existing collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Unambiguous and easy to follow
    #[serde(rename = "clarity_score")]
    pub clarity: f64,

    /// Concrete, precise requirements
    #[serde(rename = "specificity_score")]
    pub specificity: f64,

    /// Organization and formatting
    #[serde(rename = "structure_score")]
    pub structure: f64,

    /// Covers what the task needs
    #[serde(rename = "completeness_score")]
    pub completeness: f64,
}

impl Metrics {
    /// Build metrics, clamping every score into range and rounding to two decimals.
    pub fn new(clarity: f64, specificity: f64, structure: f64, completeness: f64) -> Self {
        Self {
            clarity: normalize_score(clarity),
            specificity: normalize_score(specificity),
            structure: normalize_score(structure),
            completeness: normalize_score(completeness),
        }
    }

    /// Scores in field order
    pub fn scores(&self) -> [f64; 4] {
        [
            self.clarity,
            self.specificity,
            self.structure,
            self.completeness,
        ]
    }

    /// Every score within [0.0, 1.0]
    pub fn is_within_range(&self) -> bool {
        self.scores()
            .iter()
            .all(|score| (0.0..=1.0).contains(score))
    }
}

/// Clamp into [0, 1] and round to two decimals. NaN becomes 0.
pub fn normalize_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Which fallback tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTag {
    /// Few-shot compilation from caller examples
    FewShot,
    /// Single zero-shot rewrite
    ZeroShot,
    /// Deterministic template
    #[default]
    Template,
}

impl StrategyTag {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FewShot => "few_shot",
            Self::ZeroShot => "zero_shot",
            Self::Template => "template",
        }
    }
}

impl std::fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result returned to the HTTP layer.
///
/// `strategy` and `diagnostics` are in-process observability only and never
/// appear on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimized version of the prompt
    pub optimized_prompt: String,

    /// Improvements made, most significant first
    pub improvements: Vec<String>,

    /// Human-readable explanation of the optimization
    pub explanation: String,

    /// Quality metrics of the optimized prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,

    /// Original prompt, echoed back for comparison
    pub original_prompt: String,

    /// Tier that produced this result
    #[serde(skip)]
    pub strategy: StrategyTag,

    /// Soft-constraint violations recorded during validation
    #[serde(skip)]
    pub diagnostics: Vec<String>,
}

impl OptimizationResult {
    /// Result without metrics or diagnostics
    pub fn new(
        strategy: StrategyTag,
        original_prompt: impl Into<String>,
        optimized_prompt: impl Into<String>,
        improvements: Vec<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            optimized_prompt: optimized_prompt.into(),
            improvements,
            explanation: explanation.into(),
            metrics: None,
            original_prompt: original_prompt.into(),
            strategy,
            diagnostics: Vec::new(),
        }
    }
}
