//! Provider abstraction shared by the real Gemini client and test doubles.

use std::pin::Pin;

use async_stream::try_stream;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::image::ImageData;

/// One model call. The prompt is fully rendered by the gateway before it
/// reaches a provider; a provider only handles transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LLMRequest {
    pub prompt: String,
    pub model: String,
    /// At most one inline image per request.
    pub image: Option<ImageData>,
    /// When set, the provider must request JSON output constrained to this
    /// schema.
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    pub content: String,
    pub model: String,
}

/// Failure taxonomy for gateway calls. Nothing here is retried; every error
/// is scoped to the turn that triggered it.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LLMError {
    #[error("no API key configured: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingCredential,
    #[error("provider error: {message}")]
    Provider { message: String },
    #[error("structured response did not match the requested schema: {message}")]
    SchemaParse { message: String },
}

/// Incremental output from a streaming call.
#[derive(Debug, Clone, PartialEq)]
pub enum LLMStreamEvent {
    Token { delta: String },
    Completed,
}

pub type LLMStream =
    Pin<Box<dyn futures::Stream<Item = Result<LLMStreamEvent, LLMError>> + Send>>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Provider name used in diagnostics (e.g. "gemini").
    fn name(&self) -> &str;

    /// Single-shot completion.
    async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError>;

    /// Streaming completion. The default falls back to a single-shot call
    /// delivered as one token.
    async fn stream(&self, request: LLMRequest) -> Result<LLMStream, LLMError> {
        let response = self.generate(request).await?;
        let stream = try_stream! {
            yield LLMStreamEvent::Token { delta: response.content };
            yield LLMStreamEvent::Completed;
        };
        Ok(Box::pin(stream))
    }
}
