//! Domain errors for the prompt optimization engine.
//!
//! Every failure inside the optimization pipeline is a typed value. Only
//! [`RequestError`] is ever visible to callers; the rest are recovered by
//! falling through to the next strategy tier.

use thiserror::Error;

/// Failure reported by a single LM gateway call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LmError {
    /// The call did not complete within the gateway timeout.
    #[error("LM call timed out")]
    Timeout,

    /// Network, connection, or upstream HTTP failure.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The model answered, but the answer is unparseable or missing fields.
    #[error("Invalid LM response: {0}")]
    InvalidResponse(String),
}

impl LmError {
    /// Short machine-readable name of the failure kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Reason a strategy tier gave up on a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrategyError {
    /// The LM gateway call failed
    #[error(transparent)]
    Gateway(#[from] LmError),

    /// The model output did not yield a usable optimized prompt.
    #[error("Invalid strategy output: {0}")]
    InvalidOutput(String),

    /// The few-shot tier produced no acceptable trial.
    #[error("No viable compilation: {0}")]
    NoViableCompilation(String),

    /// A hard constraint of the validator was violated.
    #[error("Hard constraint violated: {0}")]
    ValidationFailure(String),
}

/// Malformed input, rejected before the pipeline starts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    /// `original_prompt` is blank
    #[error("original_prompt must not be empty")]
    EmptyOriginalPrompt,

    /// `purpose` is blank
    #[error("purpose must not be empty")]
    EmptyPurpose,

    /// `temperature` outside [0.0, 1.0]
    #[error("temperature must be within [0.0, 1.0], got {0}")]
    TemperatureOutOfRange(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lm_error_kind() {
        assert_eq!(LmError::Timeout.kind(), "timeout");
        assert_eq!(LmError::Transport("down".into()).kind(), "transport");
        assert_eq!(
            LmError::InvalidResponse("missing".into()).kind(),
            "invalid_response"
        );
    }

    #[test]
    fn test_strategy_error_from_lm_error() {
        let err: StrategyError = LmError::Timeout.into();
        assert_eq!(err, StrategyError::Gateway(LmError::Timeout));
        assert_eq!(err.to_string(), "LM call timed out");
    }

    #[test]
    fn test_request_error_display() {
        assert_eq!(
            RequestError::EmptyPurpose.to_string(),
            "purpose must not be empty"
        );
        assert_eq!(
            RequestError::TemperatureOutOfRange(1.5).to_string(),
            "temperature must be within [0.0, 1.0], got 1.5"
        );
    }
}
