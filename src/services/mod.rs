//! Service layer: the optimization tiers, validation, metrics, and the
//! controller that orchestrates them.

pub mod explanation;
pub mod fallback_controller;
pub mod few_shot;
pub mod metrics_assessor;
pub mod quality_heuristics;
pub mod strategy;
pub mod template;
pub mod validator;
pub mod zero_shot;

pub use fallback_controller::FallbackController;
pub use few_shot::{Demonstration, FewShotCompiler, Trial, MAX_DEMONSTRATIONS};
pub use metrics_assessor::MetricsAssessor;
pub use quality_heuristics::heuristic_metrics;
pub use strategy::{OptimizationStrategy, StrategyOutcome};
pub use template::TemplateOptimizer;
pub use validator::{optimization_score, validate, HardConstraint, SoftConstraint, Validation};
pub use zero_shot::ZeroShotOptimizer;
