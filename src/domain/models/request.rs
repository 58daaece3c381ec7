//! Optimization request as received from the HTTP layer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::RequestError;

/// Sampling temperature used when the request leaves it out.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One input/output pair illustrating what the prompt should achieve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Sample input
    #[serde(default)]
    pub input: String,

    /// Expected output for the input
    #[serde(default)]
    pub output: String,
}

impl Example {
    /// Example from an input/output pair
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// An example is usable when at least one side carries text.
    pub fn is_usable(&self) -> bool {
        !self.input.trim().is_empty() || !self.output.trim().is_empty()
    }
}

/// Request to optimize a prompt for a stated purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// The prompt to optimize
    pub original_prompt: String,

    /// What the prompt is meant to accomplish
    pub purpose: String,

    /// Optional input/output examples enabling the few-shot tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,

    /// Sampling temperature in [0.0, 1.0]
    #[serde(
        default = "default_temperature",
        deserialize_with = "deserialize_temperature"
    )]
    pub temperature: f32,
}

const fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

// `"temperature": null` is treated like an absent field.
fn deserialize_temperature<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(DEFAULT_TEMPERATURE))
}

impl OptimizationRequest {
    /// Request with no examples and the default temperature
    pub fn new(original_prompt: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            original_prompt: original_prompt.into(),
            purpose: purpose.into(),
            examples: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Attach examples for the few-shot tier
    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Reject malformed input before it reaches the pipeline.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.original_prompt.trim().is_empty() {
            return Err(RequestError::EmptyOriginalPrompt);
        }
        if self.purpose.trim().is_empty() {
            return Err(RequestError::EmptyPurpose);
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(RequestError::TemperatureOutOfRange(self.temperature));
        }
        Ok(())
    }

    /// Usable examples in their original order.
    pub fn usable_examples(&self) -> impl Iterator<Item = &Example> {
        self.examples
            .iter()
            .flatten()
            .filter(|example| example.is_usable())
    }

    /// Whether the few-shot tier can run
    pub fn has_usable_examples(&self) -> bool {
        self.usable_examples().next().is_some()
    }
}
