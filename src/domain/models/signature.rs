//! Signature contracts governing every LM call.
//!
//! A signature is a fixed schema of named input and output fields. The typed
//! records in this module convert to and from the string field maps that
//! travel through the [`LmGateway`](crate::domain::ports::LmGateway).

use std::collections::BTreeMap;

/// Named field values of one LM call, ordered by field name.
pub type FieldMap = BTreeMap<String, String>;

/// `purpose` field
pub const PURPOSE: &str = "purpose";
/// `original_prompt` field
pub const ORIGINAL_PROMPT: &str = "original_prompt";
/// `examples_context` field
pub const EXAMPLES_CONTEXT: &str = "examples_context";
/// `reasoning` field
pub const REASONING: &str = "reasoning";
/// `optimized_prompt` field
pub const OPTIMIZED_PROMPT: &str = "optimized_prompt";
/// `improvements` field
pub const IMPROVEMENTS: &str = "improvements";
/// `justification` field
pub const JUSTIFICATION: &str = "justification";
/// `clarity_score` field
pub const CLARITY_SCORE: &str = "clarity_score";
/// `specificity_score` field
pub const SPECIFICITY_SCORE: &str = "specificity_score";
/// `structure_score` field
pub const STRUCTURE_SCORE: &str = "structure_score";
/// `completeness_score` field
pub const COMPLETENESS_SCORE: &str = "completeness_score";

/// Most improvements kept from a single completion.
pub const MAX_IMPROVEMENTS: usize = 5;

/// One named field of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used in the chat markers
    pub name: &'static str,
    /// Shown to the model
    pub description: &'static str,
    /// Whether a completion missing this output is rejected. Inputs are always sent.
    pub required: bool,
}

/// Fixed schema of input and output fields for one kind of LM call.
#[derive(Debug, PartialEq, Eq)]
pub struct Signature {
    /// Contract name, used in logs
    pub name: &'static str,
    /// Task description for the model
    pub instructions: &'static str,
    /// Fields sent to the model
    pub inputs: &'static [FieldSpec],
    /// Fields the model must answer
    pub outputs: &'static [FieldSpec],
}

/// Prompt optimization contract.
///
/// `reasoning` comes first so the model thinks before answering; it is
/// discarded when the outputs are parsed.
pub static PROMPT_OPTIMIZATION: Signature = Signature {
    name: "prompt_optimization",
    instructions: "Rewrite the original prompt so it serves the stated purpose better. \
                   The optimized prompt must be clearer, more specific, and more effective \
                   than the original.",
    inputs: &[
        FieldSpec {
            name: PURPOSE,
            description: "The intended purpose of the prompt",
            required: true,
        },
        FieldSpec {
            name: ORIGINAL_PROMPT,
            description: "The original prompt to optimize",
            required: true,
        },
        FieldSpec {
            name: EXAMPLES_CONTEXT,
            description: "Optional examples of the inputs and outputs the prompt should handle",
            required: true,
        },
    ],
    outputs: &[
        FieldSpec {
            name: REASONING,
            description: "Step-by-step analysis of the weaknesses of the original prompt",
            required: false,
        },
        FieldSpec {
            name: OPTIMIZED_PROMPT,
            description: "Optimized version that is clearer, more specific, and more effective",
            required: true,
        },
        FieldSpec {
            name: IMPROVEMENTS,
            description: "List of specific improvements made (one per line, max 5)",
            required: true,
        },
    ],
};

/// Quality judgment contract used by the metrics assessor.
pub static QUALITY_JUDGMENT: Signature = Signature {
    name: "quality_judgment",
    instructions: "Judge the quality of the optimized prompt relative to the original. \
                   Score each dimension with a number between 0.0 and 1.0.",
    inputs: &[
        FieldSpec {
            name: ORIGINAL_PROMPT,
            description: "The prompt before optimization",
            required: true,
        },
        FieldSpec {
            name: OPTIMIZED_PROMPT,
            description: "The prompt after optimization",
            required: true,
        },
    ],
    outputs: &[
        FieldSpec {
            name: JUSTIFICATION,
            description: "Brief justification of the scores",
            required: false,
        },
        FieldSpec {
            name: CLARITY_SCORE,
            description: "How unambiguous and easy to follow the prompt is (0.0-1.0)",
            required: true,
        },
        FieldSpec {
            name: SPECIFICITY_SCORE,
            description: "How concrete and precise the requirements are (0.0-1.0)",
            required: true,
        },
        FieldSpec {
            name: STRUCTURE_SCORE,
            description: "How well organized the prompt is (0.0-1.0)",
            required: true,
        },
        FieldSpec {
            name: COMPLETENESS_SCORE,
            description: "How fully the prompt covers what the task needs (0.0-1.0)",
            required: true,
        },
    ],
};

impl Signature {
    /// Input field names in order
    pub fn input_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inputs.iter().map(|field| field.name)
    }

    /// Output field names in order
    pub fn output_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.outputs.iter().map(|field| field.name)
    }

    /// Outputs a completion must carry to be usable.
    pub fn required_output_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.outputs
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
    }
}

/// Typed inputs of [`PROMPT_OPTIMIZATION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationInputs {
    /// Stated purpose of the prompt
    pub purpose: String,
    /// Prompt before optimization
    pub original_prompt: String,
    /// Rendered demonstrations; empty for zero-shot
    pub examples_context: String,
}

impl OptimizationInputs {
    /// Input field map for the gateway
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::from([
            (PURPOSE.to_string(), self.purpose.clone()),
            (ORIGINAL_PROMPT.to_string(), self.original_prompt.clone()),
            (EXAMPLES_CONTEXT.to_string(), self.examples_context.clone()),
        ])
    }
}

/// Typed outputs of [`PROMPT_OPTIMIZATION`], with the reasoning dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationOutputs {
    /// Trimmed, non-empty
    pub optimized_prompt: String,
    /// Parsed list, at most five entries
    pub improvements: Vec<String>,
}

impl OptimizationOutputs {
    /// Parse output fields; fails unless both the prompt and the improvement
    /// list come out non-empty.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, String> {
        let optimized_prompt = fields
            .get(OPTIMIZED_PROMPT)
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        if optimized_prompt.is_empty() {
            return Err(format!("`{OPTIMIZED_PROMPT}` is missing or empty"));
        }

        let improvements = fields
            .get(IMPROVEMENTS)
            .map(|value| parse_improvements(value))
            .unwrap_or_default();
        if improvements.is_empty() {
            return Err(format!("`{IMPROVEMENTS}` is missing or empty"));
        }

        Ok(Self {
            optimized_prompt,
            improvements,
        })
    }
}

/// Typed inputs of [`QUALITY_JUDGMENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgmentInputs {
    /// Prompt before optimization
    pub original_prompt: String,
    /// Prompt after optimization
    pub optimized_prompt: String,
}

impl JudgmentInputs {
    /// Input field map for the gateway
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::from([
            (ORIGINAL_PROMPT.to_string(), self.original_prompt.clone()),
            (OPTIMIZED_PROMPT.to_string(), self.optimized_prompt.clone()),
        ])
    }
}

/// Split free-form improvement text into a clean list.
///
/// Accepts a JSON array of strings, or one improvement per line with an
/// optional bullet or ordinal prefix. At most [`MAX_IMPROVEMENTS`] are kept.
pub fn parse_improvements(text: &str) -> Vec<String> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(text.trim()) {
        return items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .take(MAX_IMPROVEMENTS)
            .collect();
    }

    text.lines()
        .map(|line| strip_list_marker(line.trim()).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(MAX_IMPROVEMENTS)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest;
        }
    }

    // Ordinals such as "1. " or "2) "
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest;
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_optimization_contract() {
        let inputs: Vec<_> = PROMPT_OPTIMIZATION.input_names().collect();
        let outputs: Vec<_> = PROMPT_OPTIMIZATION.output_names().collect();

        assert_eq!(inputs, vec![PURPOSE, ORIGINAL_PROMPT, EXAMPLES_CONTEXT]);
        assert_eq!(outputs, vec![REASONING, OPTIMIZED_PROMPT, IMPROVEMENTS]);
    }

    #[test]
    fn test_quality_judgment_contract() {
        let outputs: Vec<_> = QUALITY_JUDGMENT.output_names().collect();
        assert_eq!(outputs.len(), 5);
        assert_eq!(outputs[0], JUSTIFICATION);
    }

    #[test]
    fn test_reasoning_outputs_are_optional() {
        let required: Vec<_> = PROMPT_OPTIMIZATION.required_output_names().collect();
        assert_eq!(required, vec![OPTIMIZED_PROMPT, IMPROVEMENTS]);

        let required: Vec<_> = QUALITY_JUDGMENT.required_output_names().collect();
        assert_eq!(
            required,
            vec![CLARITY_SCORE, SPECIFICITY_SCORE, STRUCTURE_SCORE, COMPLETENESS_SCORE]
        );
    }

    #[test]
    fn test_optimization_inputs_to_fields() {
        let fields = OptimizationInputs {
            purpose: "docs".to_string(),
            original_prompt: "Explain".to_string(),
            examples_context: String::new(),
        }
        .to_fields();

        assert_eq!(fields.get(PURPOSE).map(String::as_str), Some("docs"));
        assert_eq!(fields.get(EXAMPLES_CONTEXT).map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_improvements_strips_markers() {
        let text = "1. Added a role\n- Specified format\n\n* Added constraints\n• Clarified scope\n2) Named the audience";
        assert_eq!(
            parse_improvements(text),
            vec![
                "Added a role",
                "Specified format",
                "Added constraints",
                "Clarified scope",
                "Named the audience",
            ]
        );
    }

    #[test]
    fn test_parse_improvements_caps_at_five() {
        let text = "a\nb\nc\nd\ne\nf\ng";
        assert_eq!(parse_improvements(text).len(), MAX_IMPROVEMENTS);
    }

    #[test]
    fn test_parse_improvements_json_array() {
        let text = r#"["Added a role", " ", "Specified format"]"#;
        assert_eq!(
            parse_improvements(text),
            vec!["Added a role", "Specified format"]
        );
    }

    #[test]
    fn test_parse_improvements_keeps_numbers_inside_text() {
        assert_eq!(parse_improvements("3 examples added"), vec!["3 examples added"]);
    }

    #[test]
    fn test_outputs_from_fields() {
        let fields = FieldMap::from([
            (REASONING.to_string(), "thinking".to_string()),
            (OPTIMIZED_PROMPT.to_string(), "  Better prompt  ".to_string()),
            (IMPROVEMENTS.to_string(), "- One\n- Two".to_string()),
        ]);

        let outputs = OptimizationOutputs::from_fields(&fields).unwrap();
        assert_eq!(outputs.optimized_prompt, "Better prompt");
        assert_eq!(outputs.improvements, vec!["One", "Two"]);
    }

    #[test]
    fn test_outputs_from_fields_rejects_missing_values() {
        let empty_prompt = FieldMap::from([
            (OPTIMIZED_PROMPT.to_string(), " ".to_string()),
            (IMPROVEMENTS.to_string(), "- One".to_string()),
        ]);
        assert!(OptimizationOutputs::from_fields(&empty_prompt).is_err());

        let no_improvements =
            FieldMap::from([(OPTIMIZED_PROMPT.to_string(), "Better".to_string())]);
        let err = OptimizationOutputs::from_fields(&no_improvements).unwrap_err();
        assert!(err.contains(IMPROVEMENTS));
    }
}
