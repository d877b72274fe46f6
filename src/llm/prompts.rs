//! Prompt template for function documentation

use crate::extract::ExportedFunctionSnippet;

const DOC_PROMPT_HEADER: &str = r#"You are writing reference documentation for a JavaScript/TypeScript function.

Produce exactly the following, in order:
1. A one-paragraph description of what the function does.
2. A Markdown table of parameters with columns Name, Type and Description. Infer the type when it is not explicit.
3. A description of the return value.
4. One example usage block.

Respond with Markdown body content only. Do not add a preamble, a heading for the function, or any closing remarks.
"#;

/// Render the fixed documentation prompt for one exported function
///
/// Deterministic: the same snippet always yields the same prompt.
pub fn build_prompt(snippet: &ExportedFunctionSnippet) -> String {
    let mut prompt = String::new();

    prompt.push_str(DOC_PROMPT_HEADER);
    prompt.push('\n');
    prompt.push_str(&format!("Function `{}` from `{}`:\n\n", snippet.name, snippet.file_path));
    prompt.push_str(&format!("```\n{}\n```\n", snippet.source_text));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet() -> ExportedFunctionSnippet {
        ExportedFunctionSnippet {
            name: "add".to_string(),
            source_text: "function add(a, b) { return a + b; }".to_string(),
            file_path: "src/math.ts".to_string(),
        }
    }

    #[test]
    fn test_prompt_carries_snippet_and_instructions() {
        let prompt = build_prompt(&snippet());

        assert!(prompt.contains("function add(a, b)"));
        assert!(prompt.contains("src/math.ts"));
        assert!(prompt.contains("parameters"));
        assert!(prompt.contains("return value"));
        assert!(prompt.contains("example usage"));
        assert!(prompt.contains("Markdown body content only"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt(&snippet()), build_prompt(&snippet()));
    }
}
