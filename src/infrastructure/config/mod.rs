//! Configuration loading
//!
//! Layered with figment: built-in defaults, `.prompt-optimizer/config.yaml`,
//! `.prompt-optimizer/local.yaml`, then `PROMPT_OPTIMIZER_*` environment
//! variables. The merged result is validated before use.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, CONFIG_DIR, ENV_PREFIX};
