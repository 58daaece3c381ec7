//! Quality metrics for an (original, optimized) prompt pair.
//!
//! The primary path asks the model for a judgment against
//! [`QUALITY_JUDGMENT`]. Any gateway failure or unreadable score falls back
//! to [`heuristic_metrics`], so assessment itself never fails.

use std::sync::Arc;

use crate::domain::error::LmError;
use crate::domain::models::signature::{
    JudgmentInputs, CLARITY_SCORE, COMPLETENESS_SCORE, SPECIFICITY_SCORE, STRUCTURE_SCORE,
};
use crate::domain::models::{Metrics, QUALITY_JUDGMENT};
use crate::domain::ports::{Completion, CompletionRequest, LmGateway};
use crate::services::quality_heuristics::heuristic_metrics;

/// Judgment calls are made greedily for stable scores.
const JUDGMENT_TEMPERATURE: f32 = 0.0;

/// Qualitative score words, strongest tier first.
const QUALITATIVE_TIERS: [(&[&str], f64); 4] = [
    (&["excellent", "high", "strong"], 0.9),
    (&["good", "clear", "adequate"], 0.7),
    (&["fair", "moderate", "acceptable"], 0.5),
    (&["poor", "weak", "unclear"], 0.3),
];

/// Scores prompt pairs, by LM judgment when available.
pub struct MetricsAssessor {
    gateway: Arc<dyn LmGateway>,
    judgment_prompt_chars: usize,
}

impl MetricsAssessor {
    /// `judgment_prompt_chars` caps each prompt sent to the judge.
    pub fn new(gateway: Arc<dyn LmGateway>, judgment_prompt_chars: usize) -> Self {
        Self {
            gateway,
            judgment_prompt_chars,
        }
    }

    /// Score the pair, falling back to heuristics on any judgment failure.
    pub async fn assess(&self, original: &str, optimized: &str, purpose: Option<&str>) -> Metrics {
        match self.judge(original, optimized).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::info!(
                    error_kind = e.kind(),
                    error = %e,
                    "Judgment unavailable, using heuristic metrics"
                );
                heuristic_metrics(optimized, purpose)
            }
        }
    }

    /// LM judgment only; no fallback.
    pub async fn judge(&self, original: &str, optimized: &str) -> Result<Metrics, LmError> {
        let inputs = JudgmentInputs {
            original_prompt: truncate_chars(original, self.judgment_prompt_chars),
            optimized_prompt: truncate_chars(optimized, self.judgment_prompt_chars),
        };

        let completion = self
            .gateway
            .complete(CompletionRequest::new(
                &QUALITY_JUDGMENT,
                inputs.to_fields(),
                JUDGMENT_TEMPERATURE,
            ))
            .await?;

        parse_judgment(&completion)
    }
}

/// Read the four scores of a judgment; every one must be present and readable.
pub fn parse_judgment(completion: &Completion) -> Result<Metrics, LmError> {
    let score = |name: &str| {
        completion
            .field(name)
            .and_then(parse_score)
            .ok_or_else(|| LmError::InvalidResponse(format!("unreadable `{name}` in judgment")))
    };

    Ok(Metrics::new(
        score(CLARITY_SCORE)?,
        score(SPECIFICITY_SCORE)?,
        score(STRUCTURE_SCORE)?,
        score(COMPLETENESS_SCORE)?,
    ))
}

/// Parse one score field into [0, 1].
///
/// A number counts only as the leading token, optionally after a `label:`
/// prefix, followed by nothing, `/N`, `%`, `out of N`, or punctuation:
/// `0.8`, `8/10`, `80%`, `4 out of 5`, `Score: 0.65 (solid)`. Bare numbers
/// above 1 are read on a 0-10 or 0-100 scale. Anything else is mapped
/// through qualitative words such as "good" or "weak".
pub fn parse_score(text: &str) -> Option<f64> {
    let text = text.trim();
    numeric_score(strip_label(text)).or_else(|| qualitative_score(text))
}

fn strip_label(text: &str) -> &str {
    match text.split_once(':') {
        Some((label, rest))
            if !label.trim().is_empty()
                && label
                    .chars()
                    .all(|c| c.is_alphabetic() || c == ' ' || c == '_') =>
        {
            rest.trim_start()
        }
        _ => text,
    }
}

fn numeric_score(text: &str) -> Option<f64> {
    let (value, rest) = leading_number(text)?;
    let rest = rest.trim_start();

    let (score, rest) = if let Some(rest) = rest.strip_prefix('%') {
        (value / 100.0, rest)
    } else if let Some((denominator, rest)) = denominator(rest) {
        if denominator <= 0.0 {
            return None;
        }
        (value / denominator, rest)
    } else {
        (implicit_scale(value), rest)
    };

    // Trailing words mean the number was part of a sentence
    match rest.trim_start().chars().next() {
        None => Some(score.clamp(0.0, 1.0)),
        Some(c) if c.is_ascii_punctuation() => Some(score.clamp(0.0, 1.0)),
        Some(_) => None,
    }
}

/// `/N` or `out of N`, returning N and the text after it.
fn denominator(text: &str) -> Option<(f64, &str)> {
    let after = match text.strip_prefix('/') {
        Some(after) => after,
        None => match text.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("out of") => &text[6..],
            _ => return None,
        },
    };
    leading_number(after.trim_start())
}

fn implicit_scale(value: f64) -> f64 {
    if value > 10.0 {
        value / 100.0
    } else if value > 1.0 {
        value / 10.0
    } else {
        value
    }
}

/// Number at the very start of `text` and the text following it.
fn leading_number(text: &str) -> Option<(f64, &str)> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, text),
    };

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (offset, c) in body.char_indices() {
        if c.is_ascii_digit() {
            seen_digit = true;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
        end = offset + 1;
    }
    if !seen_digit {
        return None;
    }

    let value: f64 = body[..end].parse().ok()?;
    Some((if negative { -value } else { value }, &body[end..]))
}

fn qualitative_score(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .collect();

    QUALITATIVE_TIERS
        .iter()
        .find(|(tier, _)| tier.iter().any(|candidate| words.contains(candidate)))
        .map(|(_, score)| *score)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
