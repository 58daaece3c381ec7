//! Domain layer for the prompt optimizer
//!
//! This module contains the request/result models, the signature contracts,
//! and the port through which the pipeline reaches a language model.

pub mod error;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use error::{LmError, RequestError, StrategyError};
