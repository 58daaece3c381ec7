//! Port trait definitions (Hexagonal Architecture)
//!
//! - LmGateway: structured completion against a signature contract
//!
//! Adapters live in `infrastructure`; `OfflineGateway` is the null
//! implementation used when no backend is configured.

pub mod lm_gateway;
pub mod offline_gateway;

pub use lm_gateway::{Completion, CompletionRequest, LmGateway};
pub use offline_gateway::OfflineGateway;
