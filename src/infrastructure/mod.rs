//! Infrastructure layer module
//!
//! This module contains the adapters and external integrations:
//! - Anthropic Messages API gateway
//! - Configuration management
//! - Logging infrastructure
//! - Project setup and service wiring
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod anthropic;
pub mod config;
pub mod logging;
pub mod setup;
