//! Common test utilities for integration tests
//!
//! Scripted gateways stand in for the language model so pipeline tests are
//! deterministic and never touch the network.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use prompt_optimizer::domain::models::signature::{
    FieldMap, CLARITY_SCORE, COMPLETENESS_SCORE, IMPROVEMENTS, JUSTIFICATION, OPTIMIZED_PROMPT,
    REASONING, SPECIFICITY_SCORE, STRUCTURE_SCORE,
};
use prompt_optimizer::domain::models::{PROMPT_OPTIMIZATION, QUALITY_JUDGMENT};
use prompt_optimizer::{Completion, CompletionRequest, LmError, LmGateway};

/// A request as seen by a test gateway
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedCall {
    pub signature: &'static str,
    pub inputs: FieldMap,
    pub temperature: f32,
}

type Script = HashMap<&'static str, VecDeque<Result<FieldMap, LmError>>>;

/// Gateway answering from a per-signature queue.
///
/// An exhausted queue answers with a transport error, the same thing an
/// unreachable backend would produce.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, signature: &'static str, response: Result<FieldMap, LmError>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .entry(signature)
            .or_default()
            .push_back(response);
        self
    }

    pub fn push_optimization(&self, optimized: &str, improvements: &str) -> &Self {
        self.push(PROMPT_OPTIMIZATION.name, Ok(optimization_fields(optimized, improvements)))
    }

    pub fn push_judgment(&self, scores: [&str; 4]) -> &Self {
        self.push(QUALITY_JUDGMENT.name, Ok(judgment_fields(scores)))
    }

    pub fn push_failure(&self, signature: &'static str) -> &Self {
        self.push(signature, Err(LmError::Transport("scripted failure".to_string())))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, signature: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.signature == signature)
            .collect()
    }
}

#[async_trait]
impl LmGateway for ScriptedGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            signature: request.signature.name,
            inputs: request.inputs.clone(),
            temperature: request.temperature,
        });

        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(request.signature.name)
            .and_then(VecDeque::pop_front);
        match next {
            Some(response) => response.map(Completion::new),
            None => Err(LmError::Transport("script exhausted".to_string())),
        }
    }
}

/// Gateway whose every call fails
#[allow(dead_code)]
pub struct FailingGateway(pub LmError);

#[async_trait]
impl LmGateway for FailingGateway {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LmError> {
        Err(self.0.clone())
    }
}

/// Gateway that never answers within any reasonable budget
#[allow(dead_code)]
pub struct StalledGateway;

#[async_trait]
impl LmGateway for StalledGateway {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LmError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(LmError::Timeout)
    }
}

#[allow(dead_code)]
pub fn optimization_fields(optimized: &str, improvements: &str) -> FieldMap {
    FieldMap::from([
        (REASONING.to_string(), "Scripted reasoning".to_string()),
        (OPTIMIZED_PROMPT.to_string(), optimized.to_string()),
        (IMPROVEMENTS.to_string(), improvements.to_string()),
    ])
}

#[allow(dead_code)]
pub fn judgment_fields(scores: [&str; 4]) -> FieldMap {
    FieldMap::from([
        (JUSTIFICATION.to_string(), "Scripted judgment".to_string()),
        (CLARITY_SCORE.to_string(), scores[0].to_string()),
        (SPECIFICITY_SCORE.to_string(), scores[1].to_string()),
        (STRUCTURE_SCORE.to_string(), scores[2].to_string()),
        (COMPLETENESS_SCORE.to_string(), scores[3].to_string()),
    ])
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
