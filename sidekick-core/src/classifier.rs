//! Query classification: three stateless decision procedures, each a single
//! gateway call on the fast tier.
//!
//! Every procedure fails closed: a malformed or out-of-contract reply
//! degrades to a safe default (the code-query branch, or no files selected)
//! instead of surfacing an error.

use std::sync::Arc;

use serde::Deserialize;

use crate::context::ContextSnippet;
use crate::gemini::schema;
use crate::llm::{ModelGateway, ModelTier};
use crate::prompts;

/// The model's judgment about a query. Closed set with an explicit arm for
/// replies outside the advertised labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    SmallTalk,
    ExplainFile,
    CodeQuery,
    /// The model replied with a label outside the contract. Downstream
    /// treats this like a code query, making the fallback explicit instead
    /// of an accidental fall-through.
    Unrecognized(String),
}

impl QueryKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "small_talk" => Self::SmallTalk,
            "explain_file" => Self::ExplainFile,
            "code_query" => Self::CodeQuery,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Whether this kind takes the code-query context path (and earns the
    /// larger-context offer afterwards).
    pub fn takes_code_query_path(&self) -> bool {
        matches!(self, Self::CodeQuery | Self::Unrecognized(_))
    }
}

#[derive(Deserialize)]
struct KindReply {
    #[serde(rename = "type")]
    kind: String,
}

pub struct QueryClassifier {
    gateway: Arc<ModelGateway>,
}

impl QueryClassifier {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Label the query. Any failure defaults to [`QueryKind::CodeQuery`].
    pub async fn classify_kind(&self, query: &str) -> QueryKind {
        let prompt = prompts::classify_kind_prompt(query);
        let reply = self
            .gateway
            .generate_structured(
                ModelTier::Fast,
                prompt,
                schema::object_with_string_field("type"),
            )
            .await;
        match reply.map(serde_json::from_value::<KindReply>) {
            Ok(Ok(reply)) => QueryKind::from_label(&reply.kind),
            Ok(Err(e)) => {
                tracing::debug!("query kind reply had an unexpected shape: {e}");
                QueryKind::CodeQuery
            }
            Err(e) => {
                tracing::debug!("query kind classification failed: {e}");
                QueryKind::CodeQuery
            }
        }
    }

    /// Pick the candidate files relevant to the query. Fails closed to an
    /// empty selection.
    pub async fn select_files(&self, query: &str, candidates: &[String]) -> Vec<String> {
        let prompt = prompts::select_files_prompt(query, candidates);
        self.string_array_call(ModelTier::Fast, prompt, "file selection")
            .await
    }

    /// Given the context an answer was grounded on, ask for any additional
    /// files needed. Runs on the capable tier since it reasons over full file
    /// bodies. Fails closed to an empty selection.
    pub async fn select_additional_files(
        &self,
        query: &str,
        current_context: &[ContextSnippet],
    ) -> Vec<String> {
        let prompt = prompts::additional_files_prompt(query, current_context);
        self.string_array_call(ModelTier::Capable, prompt, "additional context selection")
            .await
    }

    async fn string_array_call(&self, tier: ModelTier, prompt: String, what: &str) -> Vec<String> {
        let reply = self
            .gateway
            .generate_structured(tier, prompt, schema::array_of_strings())
            .await;
        match reply.map(serde_json::from_value::<Vec<String>>) {
            Ok(Ok(paths)) => paths,
            Ok(Err(e)) => {
                tracing::debug!("{what} reply was not an array of strings: {e}");
                Vec::new()
            }
            Err(e) => {
                tracing::debug!("{what} failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::ScriptedProvider;
    use pretty_assertions::assert_eq;

    fn classifier_with(provider: ScriptedProvider) -> QueryClassifier {
        let gateway = Arc::new(ModelGateway::with_provider(
            Arc::new(provider),
            "answer",
            "fast",
        ));
        QueryClassifier::new(gateway)
    }

    #[test]
    fn labels_map_to_the_closed_enum() {
        assert_eq!(QueryKind::from_label("small_talk"), QueryKind::SmallTalk);
        assert_eq!(QueryKind::from_label("explain_file"), QueryKind::ExplainFile);
        assert_eq!(QueryKind::from_label("code_query"), QueryKind::CodeQuery);
        assert_eq!(
            QueryKind::from_label("banter"),
            QueryKind::Unrecognized("banter".to_string())
        );
    }

    #[test]
    fn unrecognized_labels_take_the_code_query_path() {
        assert!(QueryKind::Unrecognized("banter".to_string()).takes_code_query_path());
        assert!(QueryKind::CodeQuery.takes_code_query_path());
        assert!(!QueryKind::SmallTalk.takes_code_query_path());
    }

    #[tokio::test]
    async fn classify_kind_parses_the_type_field() {
        let classifier = classifier_with(ScriptedProvider::new().with_text(r#"{"type":"small_talk"}"#));
        assert_eq!(classifier.classify_kind("hello").await, QueryKind::SmallTalk);
    }

    #[tokio::test]
    async fn classify_kind_defaults_to_code_query_on_garbage() {
        let classifier = classifier_with(ScriptedProvider::new().with_text("not json"));
        assert_eq!(classifier.classify_kind("hello").await, QueryKind::CodeQuery);
    }

    #[tokio::test]
    async fn classify_kind_keeps_out_of_enum_labels() {
        let classifier = classifier_with(ScriptedProvider::new().with_text(r#"{"type":"banter"}"#));
        assert_eq!(
            classifier.classify_kind("hello").await,
            QueryKind::Unrecognized("banter".to_string())
        );
    }

    #[tokio::test]
    async fn select_files_fails_closed_to_empty() {
        let classifier = classifier_with(ScriptedProvider::new().with_text("not json"));
        let selected = classifier
            .select_files("fix it", &["a.ts".to_string()])
            .await;
        assert!(selected.is_empty());
    }

    #[tokio::test]
    async fn select_files_returns_the_selection() {
        let classifier = classifier_with(ScriptedProvider::new().with_text(r#"["a.ts","b.ts"]"#));
        let selected = classifier
            .select_files("fix it", &["a.ts".to_string(), "b.ts".to_string()])
            .await;
        assert_eq!(selected, vec!["a.ts", "b.ts"]);
    }

    #[tokio::test]
    async fn additional_files_fail_closed_on_wrong_shape() {
        let classifier = classifier_with(ScriptedProvider::new().with_text(r#"{"files":[]}"#));
        let selected = classifier.select_additional_files("why", &[]).await;
        assert!(selected.is_empty());
    }
}
