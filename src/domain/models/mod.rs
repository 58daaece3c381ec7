//! Domain models: requests, results, signatures, and configuration.

pub mod config;
pub mod request;
pub mod result;
pub mod signature;

pub use config::{
    Config, LmConfig, LmProvider, LogFormat, LoggingConfig, OptimizerConfig, RateLimitConfig,
    RetryConfig, RotationPolicy,
};
pub use request::{Example, OptimizationRequest, DEFAULT_TEMPERATURE};
pub use result::{Metrics, OptimizationResult, StrategyTag};
pub use signature::{FieldMap, FieldSpec, Signature, PROMPT_OPTIMIZATION, QUALITY_JUDGMENT};
