//! Chat-style rendering of signature contracts.
//!
//! Fields are delimited by `[[ ## name ## ]]` marker lines. The system
//! message describes the contract and the user message carries the input
//! values; the model answers with one marker per output field followed by
//! `[[ ## completed ## ]]`.

use std::fmt::Write as _;

use crate::domain::models::signature::{FieldMap, Signature};

const COMPLETED: &str = "completed";

fn marker(name: &str) -> String {
    format!("[[ ## {name} ## ]]")
}

/// System message describing the contract and the answer format.
pub fn render_system(signature: &Signature) -> String {
    let mut out = String::new();

    out.push_str("Your input fields are:\n");
    for (i, field) in signature.inputs.iter().enumerate() {
        let _ = writeln!(out, "{}. `{}`: {}", i + 1, field.name, field.description);
    }

    out.push_str("Your output fields are:\n");
    for (i, field) in signature.outputs.iter().enumerate() {
        let _ = writeln!(out, "{}. `{}`: {}", i + 1, field.name, field.description);
    }

    out.push_str(
        "\nAll interactions will be structured in the following way, with the appropriate values filled in.\n\n",
    );
    for name in signature.input_names().chain(signature.output_names()) {
        let _ = write!(out, "{}\n{{{name}}}\n\n", marker(name));
    }
    out.push_str(&marker(COMPLETED));

    let _ = write!(
        out,
        "\n\nIn adhering to this structure, your objective is: {}",
        signature.instructions
    );
    out
}

/// User message carrying the input values.
pub fn render_user(signature: &Signature, inputs: &FieldMap) -> String {
    let mut out = String::new();
    for name in signature.input_names() {
        let value = inputs.get(name).map(String::as_str).unwrap_or_default();
        let _ = write!(out, "{}\n{}\n\n", marker(name), value.trim());
    }

    let outputs: Vec<String> = signature
        .output_names()
        .map(|name| format!("`{}`", marker(name)))
        .collect();
    let _ = write!(
        out,
        "Respond with the corresponding output fields, starting with the field {}, \
         and then ending with the marker for `{}`.",
        outputs.join(", then "),
        marker(COMPLETED)
    );
    out
}

/// Split a completion into the signature's output fields.
///
/// Text before the first marker and sections for unknown fields are
/// ignored. Optional outputs may be absent; fails naming the first missing
/// required output.
pub fn parse_completion(signature: &Signature, text: &str) -> Result<FieldMap, String> {
    let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if let Some(name) = parse_marker(line) {
            if name == COMPLETED {
                break;
            }
            sections.push((name, Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line);
        }
    }

    let mut fields = FieldMap::new();
    for (name, body) in sections {
        let Some(output) = signature.outputs.iter().find(|field| field.name == name) else {
            continue;
        };
        // First occurrence wins
        fields
            .entry(output.name.to_string())
            .or_insert_with(|| body.join("\n").trim().to_string());
    }

    if let Some(missing) = signature
        .required_output_names()
        .find(|name| !fields.contains_key(*name))
    {
        return Err(format!("completion is missing output field `{missing}`"));
    }
    Ok(fields)
}

fn parse_marker(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("[[ ## ")?
        .strip_suffix(" ## ]]")
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::signature::{
        EXAMPLES_CONTEXT, IMPROVEMENTS, OPTIMIZED_PROMPT, ORIGINAL_PROMPT, PROMPT_OPTIMIZATION,
        PURPOSE, QUALITY_JUDGMENT, REASONING,
    };

    #[test]
    fn test_render_system_lists_fields() {
        let system = render_system(&PROMPT_OPTIMIZATION);

        assert!(system.contains("1. `purpose`: The intended purpose of the prompt"));
        assert!(system.contains("[[ ## optimized_prompt ## ]]\n{optimized_prompt}"));
        assert!(system.contains("[[ ## completed ## ]]"));
        assert!(system.ends_with(PROMPT_OPTIMIZATION.instructions));
    }

    #[test]
    fn test_render_user_fills_inputs() {
        let inputs = FieldMap::from([
            (PURPOSE.to_string(), "docs".to_string()),
            (ORIGINAL_PROMPT.to_string(), "Explain this".to_string()),
        ]);
        let user = render_user(&PROMPT_OPTIMIZATION, &inputs);

        assert!(user.starts_with("[[ ## purpose ## ]]\ndocs\n\n[[ ## original_prompt ## ]]\nExplain this\n\n"));
        assert!(user.contains(&format!("[[ ## {EXAMPLES_CONTEXT} ## ]]\n\n")));
        assert!(user.contains("starting with the field `[[ ## reasoning ## ]]`"));
    }

    #[test]
    fn test_parse_completion() {
        let text = "Sure, here you go.\n\
                    [[ ## reasoning ## ]]\nThe prompt is vague.\n\n\
                    [[ ## optimized_prompt ## ]]\nExplain what this function does.\nUse 3 bullets.\n\n\
                    [[ ## improvements ## ]]\n- Named the subject\n- Set a format\n\n\
                    [[ ## completed ## ]]\ntrailing chatter";
        let fields = parse_completion(&PROMPT_OPTIMIZATION, text).unwrap();

        assert_eq!(fields[REASONING], "The prompt is vague.");
        assert_eq!(
            fields[OPTIMIZED_PROMPT],
            "Explain what this function does.\nUse 3 bullets."
        );
        assert_eq!(fields[IMPROVEMENTS], "- Named the subject\n- Set a format");
    }

    #[test]
    fn test_parse_completion_missing_field() {
        let text = "[[ ## justification ## ]]\nok\n[[ ## clarity_score ## ]]\n0.8";
        let err = parse_completion(&QUALITY_JUDGMENT, text).unwrap_err();
        assert!(err.contains("specificity_score"));
    }

    #[test]
    fn test_parse_completion_optional_outputs_may_be_absent() {
        let text = "[[ ## optimized_prompt ## ]]\nExplain what this function does.\n\n\
                    [[ ## improvements ## ]]\n- Named the subject\n\n\
                    [[ ## completed ## ]]";
        let fields = parse_completion(&PROMPT_OPTIMIZATION, text).unwrap();
        assert!(!fields.contains_key(REASONING));
        assert_eq!(fields[OPTIMIZED_PROMPT], "Explain what this function does.");

        let judgment = "[[ ## clarity_score ## ]]\n0.8\n[[ ## specificity_score ## ]]\n0.7\n\
                        [[ ## structure_score ## ]]\n0.6\n[[ ## completeness_score ## ]]\n0.5";
        let fields = parse_completion(&QUALITY_JUDGMENT, judgment).unwrap();
        assert_eq!(fields.len(), 4);
        assert!(!fields.contains_key("justification"));
    }

    #[test]
    fn test_parse_completion_ignores_unknown_sections() {
        let text = "[[ ## reasoning ## ]]\nr\n[[ ## bonus ## ]]\nx\n\
                    [[ ## optimized_prompt ## ]]\np\n[[ ## improvements ## ]]\ni";
        let fields = parse_completion(&PROMPT_OPTIMIZATION, text).unwrap();
        assert_eq!(fields.len(), 3);
        assert!(!fields.contains_key("bonus"));
    }
}
