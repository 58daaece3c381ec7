//! Offline gateway implementation.
//!
//! Used when no LM backend is configured but the pipeline still needs an
//! `LmGateway`. Every call fails, so requests degrade to the template tier
//! and heuristic metrics.

use async_trait::async_trait;

use super::{Completion, CompletionRequest, LmGateway};
use crate::domain::error::LmError;

/// A gateway that never reaches a model.
#[derive(Debug, Clone, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    /// Gateway that fails every call
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LmGateway for OfflineGateway {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LmError> {
        Err(LmError::Transport("offline: no LM backend configured".to_string()))
    }
}
