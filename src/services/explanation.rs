//! Human-readable explanation attached to every result.

/// Explanation used by the template tier.
pub const TEMPLATE_EXPLANATION: &str = "Applied template-based optimization to structure the \
     prompt more effectively. The optimized version provides clearer context and expectations \
     for better results.";

/// How many improvements the explanation names.
const NAMED_IMPROVEMENTS: usize = 3;

/// Describe an optimization from the prompt pair and its improvements.
pub fn explain(original: &str, optimized: &str, improvements: &[String]) -> String {
    let mut explanation =
        String::from("The prompt has been optimized to enhance clarity and effectiveness. ");

    let original_len = original.chars().count();
    let optimized_len = optimized.chars().count();
    if optimized_len > original_len {
        explanation
            .push_str("Additional context and specificity were added to guide better responses. ");
    } else if optimized_len < original_len {
        explanation
            .push_str("The prompt was streamlined for conciseness while maintaining clarity. ");
    }

    if !improvements.is_empty() {
        let named: Vec<&str> = improvements
            .iter()
            .take(NAMED_IMPROVEMENTS)
            .map(String::as_str)
            .collect();
        explanation.push_str(&format!("Key improvements include: {}. ", named.join(", ")));
    }

    explanation.push_str("These changes should result in more accurate and relevant outputs.");
    explanation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_longer_prompt() {
        let improvements = vec![
            "Added role".to_string(),
            "Specified format".to_string(),
            "Added constraints".to_string(),
            "Named audience".to_string(),
        ];
        let text = explain("Explain this", "Explain this function step by step.", &improvements);

        assert!(text.starts_with("The prompt has been optimized"));
        assert!(text.contains("Additional context and specificity were added"));
        assert!(text.contains("Key improvements include: Added role, Specified format, Added constraints."));
        assert!(!text.contains("Named audience"));
        assert!(text.ends_with("more accurate and relevant outputs."));
    }

    #[test]
    fn test_explain_shorter_prompt() {
        let text = explain("A very long and rambling prompt", "Short prompt", &[]);
        assert!(text.contains("streamlined for conciseness"));
        assert!(!text.contains("Key improvements"));
    }

    #[test]
    fn test_explain_same_length_has_no_length_sentence() {
        let text = explain("abc", "xyz", &["One".to_string()]);
        assert!(!text.contains("Additional context"));
        assert!(!text.contains("streamlined"));
        assert!(text.contains("Key improvements include: One."));
    }
}
