//! Deterministic quality scoring from prompt text alone.
//!
//! Pure and infallible: this is what metrics fall back to whenever the
//! judgment call is unavailable.

use crate::domain::models::Metrics;

const DIRECTIVE_VERBS: [&str; 16] = [
    "explain", "describe", "list", "provide", "write", "generate", "summarize", "include",
    "use", "create", "identify", "analyze", "compare", "return", "format", "answer",
];

const SPECIFICITY_KEYWORDS: [&str; 8] = [
    "specific", "exactly", "must", "should", "format", "structure", "please", "provide",
];

const STRUCTURE_INDICATORS: [&str; 7] = ["\n", ":", "-", "1.", "2.", "•", "Step"];

/// Sentence length that reads most clearly.
const IDEAL_SENTENCE_WORDS: f64 = 15.0;

/// Word count at which a prompt counts as fully detailed.
const COMPLETE_WORD_COUNT: f64 = 50.0;

/// Score a prompt on the four quality dimensions.
///
/// `purpose`, when known, feeds keyword coverage into completeness.
pub fn heuristic_metrics(prompt: &str, purpose: Option<&str>) -> Metrics {
    let lower = prompt.to_lowercase();
    let words = words_of(&lower);

    Metrics::new(
        clarity(prompt, &words),
        specificity(&lower, &words),
        structure(prompt),
        completeness(&words, purpose),
    )
}

fn clarity(prompt: &str, words: &[String]) -> f64 {
    let sentences: Vec<usize> = prompt
        .split(['.', '!', '?'])
        .map(|sentence| sentence.split_whitespace().count())
        .filter(|count| *count > 0)
        .collect();
    let average = if sentences.is_empty() {
        0.0
    } else {
        sentences.iter().sum::<usize>() as f64 / sentences.len() as f64
    };
    let length_score =
        (1.0 - (average - IDEAL_SENTENCE_WORDS).abs() / (2.0 * IDEAL_SENTENCE_WORDS)).clamp(0.0, 1.0);

    let directives = DIRECTIVE_VERBS
        .iter()
        .filter(|verb| words.iter().any(|word| word == *verb))
        .count();
    let directive_score = (directives as f64 / 2.0).min(1.0);

    0.7 * length_score + 0.3 * directive_score
}

fn specificity(lower: &str, words: &[String]) -> f64 {
    let keywords = SPECIFICITY_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count();
    let numbers = words
        .iter()
        .filter(|word| word.chars().any(|c| c.is_ascii_digit()))
        .count()
        .min(2);
    ((keywords + numbers) as f64 / 4.0).min(1.0)
}

fn structure(prompt: &str) -> f64 {
    let indicators = STRUCTURE_INDICATORS
        .iter()
        .filter(|indicator| prompt.contains(*indicator))
        .count();
    (indicators as f64 / 4.0).min(1.0)
}

fn completeness(words: &[String], purpose: Option<&str>) -> f64 {
    let length_score = (words.len() as f64 / COMPLETE_WORD_COUNT).min(1.0);

    let keywords: Vec<String> = purpose
        .map(|purpose| {
            words_of(&purpose.to_lowercase())
                .into_iter()
                .filter(|word| word.chars().count() > 3)
                .collect()
        })
        .unwrap_or_default();
    if keywords.is_empty() {
        return length_score;
    }

    let covered = keywords
        .iter()
        .filter(|keyword| words.iter().any(|word| word.starts_with(keyword.as_str())))
        .count();
    let coverage = covered as f64 / keywords.len() as f64;

    0.5 * length_score + 0.5 * coverage
}

/// Alphanumeric words of already-lowercased text.
fn words_of(lower: &str) -> Vec<String> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_scores_in_range() {
        let metrics = heuristic_metrics("", None);
        assert!(metrics.is_within_range());
        assert_eq!(metrics.structure, 0.0);
        assert_eq!(metrics.completeness, 0.0);
    }

    #[test]
    fn test_structured_prompt_scores_higher() {
        let plain = heuristic_metrics("explain this", None);
        let structured = heuristic_metrics(
            "Task: explain this function.\n\nSteps:\n1. Describe the inputs\n2. Describe the outputs\n- Use exactly 3 bullet points",
            None,
        );

        assert!(structured.structure > plain.structure);
        assert!(structured.specificity > plain.specificity);
    }

    #[test]
    fn test_purpose_coverage_raises_completeness() {
        let prompt = "Generate documentation for this module.";
        let covered = heuristic_metrics(prompt, Some("generate documentation"));
        let uncovered = heuristic_metrics(prompt, Some("translate poetry"));
        assert!(covered.completeness > uncovered.completeness);
    }

    #[test]
    fn test_heuristics_are_deterministic() {
        let prompt = "Please provide exactly 5 examples.";
        assert_eq!(
            heuristic_metrics(prompt, Some("examples")),
            heuristic_metrics(prompt, Some("examples"))
        );
    }
}
