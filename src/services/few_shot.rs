//! Few-shot compilation from user-supplied examples.
//!
//! Examples become demonstrations rendered into the `examples_context`
//! input. A fixed number of trial completions is drawn at stepped
//! temperatures, each scored with [`optimization_score`], and the best
//! trial above the acceptance threshold becomes the candidate.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::StrategyError;
use crate::domain::models::signature::{OptimizationInputs, OptimizationOutputs};
use crate::domain::models::{OptimizationRequest, OptimizerConfig, StrategyTag, PROMPT_OPTIMIZATION};
use crate::domain::ports::{CompletionRequest, LmGateway};
use crate::services::strategy::{candidate_from_outputs, OptimizationStrategy, StrategyOutcome};
use crate::services::validator::optimization_score;

/// Upper bound on demonstrations, whatever the configuration says.
pub const MAX_DEMONSTRATIONS: usize = 5;

/// Temperature added per trial so trials explore different completions.
const TRIAL_TEMPERATURE_STEP: f32 = 0.1;

/// One example in the form used to prime the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demonstration {
    /// Example input, `N/A` when blank
    pub input: String,
    /// Example output, `N/A` when blank
    pub output: String,
}

/// A scored trial completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// Position in the trial sequence
    pub index: usize,
    /// `optimization_score` of the trial output
    pub score: f64,
    /// Parsed completion
    pub outputs: OptimizationOutputs,
}

/// Render demonstrations as the `examples_context` input.
pub fn render_examples_context(demonstrations: &[Demonstration]) -> String {
    if demonstrations.is_empty() {
        return String::new();
    }

    let mut context = String::from("Consider these examples:\n");
    for (i, demo) in demonstrations.iter().enumerate() {
        let input = if demo.input.trim().is_empty() { "N/A" } else { demo.input.as_str() };
        let output = if demo.output.trim().is_empty() { "N/A" } else { demo.output.as_str() };
        // Writing to a String cannot fail
        let _ = write!(context, "Example {}:\n  Input: {input}\n  Output: {output}\n", i + 1);
    }
    context
}

/// Highest score wins; ties go to the earliest trial.
pub fn select_best(trials: &[Trial]) -> Option<&Trial> {
    trials.iter().fold(None, |best: Option<&Trial>, trial| match best {
        Some(current) if current.score >= trial.score => Some(current),
        _ => Some(trial),
    })
}

/// Few-shot tier.
pub struct FewShotCompiler {
    gateway: Arc<dyn LmGateway>,
    max_demos: usize,
    num_trials: usize,
    min_acceptance_score: f64,
}

impl FewShotCompiler {
    /// `max_demos` is clamped to the demonstration cap.
    pub fn new(gateway: Arc<dyn LmGateway>, config: &OptimizerConfig) -> Self {
        Self {
            gateway,
            max_demos: config.max_demos.clamp(1, MAX_DEMONSTRATIONS),
            num_trials: config.num_trials.max(1),
            min_acceptance_score: config.min_acceptance_score,
        }
    }

    /// The first usable examples up to the cap, in input order.
    pub fn demonstrations(&self, request: &OptimizationRequest) -> Vec<Demonstration> {
        request
            .usable_examples()
            .take(self.max_demos)
            .map(|example| Demonstration {
                input: example.input.clone(),
                output: example.output.clone(),
            })
            .collect()
    }

    /// Draw and score every trial. Failed trials are skipped.
    async fn run_trials(&self, request: &OptimizationRequest, examples_context: String) -> Vec<Trial> {
        let fields = OptimizationInputs {
            purpose: request.purpose.clone(),
            original_prompt: request.original_prompt.clone(),
            examples_context,
        }
        .to_fields();

        let mut trials = Vec::with_capacity(self.num_trials);
        for index in 0..self.num_trials {
            let temperature =
                (request.temperature + TRIAL_TEMPERATURE_STEP * index as f32).min(1.0);
            let completion = match self
                .gateway
                .complete(CompletionRequest::new(&PROMPT_OPTIMIZATION, fields.clone(), temperature))
                .await
            {
                Ok(completion) => completion,
                Err(e) => {
                    tracing::warn!(trial = index, error_kind = e.kind(), error = %e, "Few-shot trial failed");
                    continue;
                }
            };

            match OptimizationOutputs::from_fields(&completion.fields) {
                Ok(outputs) => {
                    let score = optimization_score(&request.original_prompt, &outputs.optimized_prompt);
                    tracing::debug!(trial = index, score, "Scored few-shot trial");
                    trials.push(Trial { index, score, outputs });
                }
                Err(reason) => {
                    tracing::warn!(trial = index, %reason, "Few-shot trial output unparseable");
                }
            }
        }
        trials
    }

    /// Run the trials and keep the best acceptable one.
    pub async fn compile(&self, request: &OptimizationRequest) -> StrategyOutcome {
        let demonstrations = self.demonstrations(request);
        if demonstrations.is_empty() {
            return Err(StrategyError::NoViableCompilation(
                "no usable demonstrations".to_string(),
            ));
        }

        let context = render_examples_context(&demonstrations);
        let trials = self.run_trials(request, context).await;

        let best = select_best(&trials).ok_or_else(|| {
            StrategyError::NoViableCompilation(format!("all {} trials failed", self.num_trials))
        })?;

        if best.score < self.min_acceptance_score {
            return Err(StrategyError::NoViableCompilation(format!(
                "best trial scored {:.2}, below acceptance threshold {:.2}",
                best.score, self.min_acceptance_score
            )));
        }

        tracing::info!(
            demonstrations = demonstrations.len(),
            trials = trials.len(),
            selected = best.index,
            score = best.score,
            "Few-shot compilation selected trial"
        );

        Ok(candidate_from_outputs(StrategyTag::FewShot, request, best.outputs.clone()))
    }
}

#[async_trait]
impl OptimizationStrategy for FewShotCompiler {
    fn tag(&self) -> StrategyTag {
        StrategyTag::FewShot
    }

    async fn attempt(&self, request: &OptimizationRequest) -> StrategyOutcome {
        self.compile(request).await
    }
}
