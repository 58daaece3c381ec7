//! Prompt optimizer
//!
//! Rewrites a prompt for a stated purpose. A request runs through a chain of
//! strategies that degrade instead of failing: few-shot compilation from
//! caller examples, zero-shot rewriting, and a deterministic template. Results
//! carry quality metrics judged by the language model, or computed
//! heuristically when the model is unavailable.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): request/result models, signatures, the LM gateway port
//! - **Service Layer** (`services`): strategies, validation, metrics, fallback orchestration
//! - **Infrastructure Layer** (`infrastructure`): Anthropic gateway, config loading, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use prompt_optimizer::{FallbackController, OfflineGateway, OptimizationRequest, OptimizerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let controller = FallbackController::new(Arc::new(OfflineGateway::new()), OptimizerConfig::default());
//!     let result = controller
//!         .optimize(OptimizationRequest::new("Explain this", "generate documentation"))
//!         .await?;
//!     println!("{}", result.optimized_prompt);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::error::{LmError, RequestError, StrategyError};
pub use domain::models::{
    Config, Example, LmConfig, LoggingConfig, Metrics, OptimizationRequest, OptimizationResult,
    OptimizerConfig, RateLimitConfig, RetryConfig, StrategyTag,
};
pub use domain::ports::{Completion, CompletionRequest, LmGateway, OfflineGateway};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{FallbackController, TemplateOptimizer};
