//! LM Gateway port
//!
//! The single abstraction point between the optimization pipeline and a
//! language model. Adapters own transport, timeout, and retry policy; the
//! pipeline only ever sees a [`Completion`] or a typed [`LmError`].

use async_trait::async_trait;

use crate::domain::error::LmError;
use crate::domain::models::signature::{FieldMap, Signature};

/// A structured request: fill the signature's outputs from its inputs.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Contract the completion must honor
    pub signature: &'static Signature,

    /// Values for the signature's input fields
    pub inputs: FieldMap,

    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,
}

impl CompletionRequest {
    /// Request against `signature`
    pub fn new(signature: &'static Signature, inputs: FieldMap, temperature: f32) -> Self {
        Self {
            signature,
            inputs,
            temperature,
        }
    }

    /// Value of one input field
    pub fn input(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).map(String::as_str)
    }
}

/// Output field values produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Output values by field name
    pub fields: FieldMap,
}

impl Completion {
    /// Completion from parsed output fields
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    /// Value of one output field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Port for structured LM completion.
///
/// Implementations must be `Send + Sync` and keep no state between calls
/// that affects results. Every failure path is returned as an [`LmError`];
/// implementations never panic on upstream misbehavior.
#[async_trait]
pub trait LmGateway: Send + Sync {
    /// Complete one structured request.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LmError>;
}
