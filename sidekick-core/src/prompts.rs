//! Fixed prompt text: the assistant persona preamble, the answer template,
//! and the three classification prompts. None of this is user-configurable.

use crate::context::ContextSnippet;

/// Persona and response-style rules prepended verbatim to every answer
/// prompt.
pub const SYSTEM_PREAMBLE: &str = "You are Sidekick, a friendly and knowledgeable AI assistant \
specialized in coding. You guide users through coding tasks, provide clear examples, and answer \
personality-related questions with a warm, helpful tone. Keep answers concise unless the user \
asks for depth, and when generating UI code prefer complete, runnable snippets.";

/// Render the full answer prompt: preamble, context block, user request.
pub fn answer_prompt(context: &[ContextSnippet], user_request: &str) -> String {
    let rendered: Vec<String> = context.iter().map(ContextSnippet::render).collect();
    format!(
        "{SYSTEM_PREAMBLE}\n\nWorkspace context:\n{}\n--\nUser request: {}",
        rendered.join("\n"),
        user_request
    )
}

/// Prompt for classifying a query into small_talk / explain_file /
/// code_query.
pub fn classify_kind_prompt(query: &str) -> String {
    format!(
        "You are a code assistant. Classify the following user query into one of three \
categories: \"small_talk\" (greetings), \"explain_file\" (explain current file), or \
\"code_query\" (code-related queries). Respond ONLY with a JSON object like \
{{\"type\": \"<category>\"}}. Query: \"{query}\""
    )
}

/// Prompt for picking the files required to answer a query.
pub fn select_files_prompt(query: &str, candidates: &[String]) -> String {
    let file_list = serde_json::to_string(candidates).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are a code assistant. Given this question and a list of project files, return a \
JSON array of filenames required to answer.\nQuestion: \"{query}\"\nFiles: {file_list}\n\
Respond ONLY with a JSON array of filenames."
    )
}

/// Prompt for deciding whether more files are needed given the context an
/// unsatisfactory answer was grounded on.
pub fn additional_files_prompt(query: &str, context: &[ContextSnippet]) -> String {
    let rendered: Vec<String> = context.iter().map(ContextSnippet::render).collect();
    format!(
        "You are a code assistant. Given the user query: \"{query}\" and the current context \
from files:\n{}\nDetermine if additional files are needed. Return a JSON array of full file \
paths for any additional files. If none, return an empty array. Respond ONLY with the JSON \
array.",
        rendered.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_prompt_places_preamble_context_and_request() {
        let context = vec![ContextSnippet::new("main.ts", "print('hi')")];
        let prompt = answer_prompt(&context, "explain this file");

        assert!(prompt.starts_with(SYSTEM_PREAMBLE));
        assert!(prompt.contains("Workspace context:\nmain.ts:\nprint('hi')\n---"));
        assert!(prompt.ends_with("User request: explain this file"));
    }

    #[test]
    fn answer_prompt_with_empty_context_keeps_the_template() {
        let prompt = answer_prompt(&[], "hello");
        assert!(prompt.contains("Workspace context:\n\n--\nUser request: hello"));
    }

    #[test]
    fn select_files_prompt_embeds_candidates_as_json() {
        let prompt = select_files_prompt("fix the bug", &["a.ts".to_string(), "b.ts".to_string()]);
        assert!(prompt.contains(r#"["a.ts","b.ts"]"#));
        assert!(prompt.contains("fix the bug"));
    }

    #[test]
    fn classify_kind_prompt_names_all_three_categories() {
        let prompt = classify_kind_prompt("hi");
        for label in ["small_talk", "explain_file", "code_query"] {
            assert!(prompt.contains(label));
        }
    }
}
