//! The model gateway: the only place that talks to a provider.
//!
//! It owns prompt templating (fixed preamble + context block + user request)
//! and the two model tiers: a fast tier for classification calls and a
//! capable tier for answer generation. Credential absence is handled here so
//! callers never need to know whether a provider exists.

use std::sync::Arc;

use serde_json::Value;

use crate::config::SidekickConfig;
use crate::context::ContextSnippet;
use crate::image::ImageData;
use crate::llm::provider::{LLMError, LLMProvider, LLMRequest, LLMStream};
use crate::llm::providers::GeminiProvider;
use crate::prompts;

/// Which of the two configured models a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Cheap model for classification and file selection.
    Fast,
    /// Capable model for answer generation.
    Capable,
}

pub struct ModelGateway {
    /// `None` when no API key is configured.
    provider: Option<Arc<dyn LLMProvider>>,
    answer_model: String,
    classifier_model: String,
}

impl ModelGateway {
    /// Build a gateway over the real Gemini provider. Without an API key the
    /// gateway still constructs; every call then degrades per its contract.
    pub fn from_config(config: &SidekickConfig) -> Self {
        let provider: Option<Arc<dyn LLMProvider>> = config
            .api_key
            .clone()
            .map(|key| Arc::new(GeminiProvider::new(key)) as Arc<dyn LLMProvider>);
        Self {
            provider,
            answer_model: config.answer_model.clone(),
            classifier_model: config.classifier_model.clone(),
        }
    }

    /// Build a gateway over an arbitrary provider (used by tests).
    pub fn with_provider(
        provider: Arc<dyn LLMProvider>,
        answer_model: impl Into<String>,
        classifier_model: impl Into<String>,
    ) -> Self {
        Self {
            provider: Some(provider),
            answer_model: answer_model.into(),
            classifier_model: classifier_model.into(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.provider.is_some()
    }

    /// Single-shot answer generation on the capable tier.
    pub async fn generate(
        &self,
        context: &[ContextSnippet],
        user_request: &str,
        image: Option<ImageData>,
    ) -> Result<String, LLMError> {
        let provider = self.provider.as_ref().ok_or(LLMError::MissingCredential)?;
        let request = LLMRequest {
            prompt: prompts::answer_prompt(context, user_request),
            model: self.answer_model.clone(),
            image,
            response_schema: None,
        };
        let response = provider.generate(request).await?;
        Ok(response.content)
    }

    /// Streaming answer generation on the capable tier.
    ///
    /// A missing credential produces an empty stream immediately; a provider
    /// failure surfaces as a single error item.
    pub async fn generate_streaming(
        &self,
        context: &[ContextSnippet],
        user_request: &str,
        image: Option<ImageData>,
    ) -> LLMStream {
        let Some(provider) = self.provider.as_ref() else {
            tracing::warn!("streaming generation requested without an API key");
            return Box::pin(futures::stream::empty());
        };
        let request = LLMRequest {
            prompt: prompts::answer_prompt(context, user_request),
            model: self.answer_model.clone(),
            image,
            response_schema: None,
        };
        match provider.stream(request).await {
            Ok(stream) => stream,
            Err(error) => Box::pin(futures::stream::once(async move { Err(error) })),
        }
    }

    /// Schema-constrained JSON generation. The returned value is parsed
    /// JSON; shape validation stays with the caller.
    pub async fn generate_structured(
        &self,
        tier: ModelTier,
        prompt: String,
        schema: Value,
    ) -> Result<Value, LLMError> {
        let provider = self.provider.as_ref().ok_or(LLMError::MissingCredential)?;
        let request = LLMRequest {
            prompt,
            model: self.model_for(tier).to_string(),
            image: None,
            response_schema: Some(schema),
        };
        let response = provider.generate(request).await?;
        serde_json::from_str(&response.content).map_err(|e| LLMError::SchemaParse {
            message: format!("{e}: {}", truncate_for_log(&response.content)),
        })
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.classifier_model,
            ModelTier::Capable => &self.answer_model,
        }
    }
}

fn truncate_for_log(payload: &str) -> &str {
    let cut = payload
        .char_indices()
        .nth(120)
        .map(|(i, _)| i)
        .unwrap_or(payload.len());
    &payload[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::ScriptedProvider;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    fn no_credential_gateway() -> ModelGateway {
        ModelGateway {
            provider: None,
            answer_model: "answer".to_string(),
            classifier_model: "fast".to_string(),
        }
    }

    #[tokio::test]
    async fn generate_without_credential_fails() {
        let gateway = no_credential_gateway();
        let error = gateway.generate(&[], "hi", None).await.unwrap_err();
        assert_eq!(error, LLMError::MissingCredential);
    }

    #[tokio::test]
    async fn streaming_without_credential_is_empty() {
        let gateway = no_credential_gateway();
        let mut stream = gateway.generate_streaming(&[], "hi", None).await;
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn structured_without_credential_fails() {
        let gateway = no_credential_gateway();
        let error = gateway
            .generate_structured(ModelTier::Fast, "p".to_string(), serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(error, LLMError::MissingCredential);
    }

    #[tokio::test]
    async fn structured_parses_json_payloads() {
        let provider = Arc::new(ScriptedProvider::new().with_text(r#"["a.ts"]"#));
        let gateway = ModelGateway::with_provider(provider, "answer", "fast");

        let value = gateway
            .generate_structured(
                ModelTier::Fast,
                "pick".to_string(),
                crate::gemini::schema::array_of_strings(),
            )
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!(["a.ts"]));
    }

    #[tokio::test]
    async fn structured_rejects_malformed_payloads() {
        let provider = Arc::new(ScriptedProvider::new().with_text("not json"));
        let gateway = ModelGateway::with_provider(provider, "answer", "fast");

        let error = gateway
            .generate_structured(
                ModelTier::Fast,
                "pick".to_string(),
                crate::gemini::schema::array_of_strings(),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, LLMError::SchemaParse { .. }));
    }

    #[tokio::test]
    async fn structured_calls_target_the_requested_tier() {
        let provider = Arc::new(ScriptedProvider::new().with_text("[]").with_text("[]"));
        let gateway = ModelGateway::with_provider(provider.clone(), "answer", "fast");

        for tier in [ModelTier::Fast, ModelTier::Capable] {
            gateway
                .generate_structured(
                    tier,
                    "pick".to_string(),
                    crate::gemini::schema::array_of_strings(),
                )
                .await
                .unwrap();
        }
        let models: Vec<String> = provider.requests().iter().map(|r| r.model.clone()).collect();
        assert_eq!(models, vec!["fast", "answer"]);
    }

    #[tokio::test]
    async fn answer_calls_use_the_capable_tier_and_template() {
        let provider = Arc::new(ScriptedProvider::new().with_text("answer text"));
        let gateway = ModelGateway::with_provider(provider.clone(), "answer", "fast");

        let content = gateway.generate(&[], "hello", None).await.unwrap();
        assert_eq!(content, "answer text");
        let request = &provider.requests()[0];
        assert_eq!(request.model, "answer");
        assert!(request.prompt.contains("User request: hello"));
        assert!(request.prompt.starts_with(crate::prompts::SYSTEM_PREAMBLE));
    }
}
