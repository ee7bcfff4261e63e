//! Deterministic provider for tests that need an `LLMProvider` without
//! performing network calls. Responses are returned in FIFO order and every
//! received request is recorded for assertion.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_stream::try_stream;
use async_trait::async_trait;

use super::provider::{LLMError, LLMProvider, LLMRequest, LLMResponse, LLMStream, LLMStreamEvent};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Returned whole from `generate`, or as a single token from `stream`.
    Text(String),
    /// Streamed as one token per entry; `generate` joins them.
    Chunks(Vec<String>),
    /// Returned as the call's error.
    Error(LLMError),
}

/// FIFO-scripted `LLMProvider` test double.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Text(text.into()))
    }

    pub fn with_chunks<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Scripted::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    pub fn with_error(self, error: LLMError) -> Self {
        self.push(Scripted::Error(error))
    }

    fn push(self, scripted: Scripted) -> Self {
        self.queue.lock().unwrap().push_back(scripted);
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: LLMRequest) -> Result<Scripted, LLMError> {
        self.requests.lock().unwrap().push(request);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LLMError::Provider {
                message: "ScriptedProvider has no queued responses".to_string(),
            })
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        let model = request.model.clone();
        match self.next(request)? {
            Scripted::Text(content) => Ok(LLMResponse { content, model }),
            Scripted::Chunks(chunks) => Ok(LLMResponse {
                content: chunks.concat(),
                model,
            }),
            Scripted::Error(error) => Err(error),
        }
    }

    async fn stream(&self, request: LLMRequest) -> Result<LLMStream, LLMError> {
        let scripted = self.next(request)?;
        let stream = try_stream! {
            match scripted {
                Scripted::Text(content) => {
                    yield LLMStreamEvent::Token { delta: content };
                    yield LLMStreamEvent::Completed;
                }
                Scripted::Chunks(chunks) => {
                    for delta in chunks {
                        yield LLMStreamEvent::Token { delta };
                    }
                    yield LLMStreamEvent::Completed;
                }
                Scripted::Error(error) => {
                    Err(error)?;
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn request(prompt: &str) -> LLMRequest {
        LLMRequest {
            prompt: prompt.to_string(),
            model: "test-model".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn returns_responses_in_fifo_order() {
        let provider = ScriptedProvider::new().with_text("first").with_text("second");

        let one = provider.generate(request("a")).await.unwrap();
        let two = provider.generate(request("b")).await.unwrap();
        assert_eq!(one.content, "first");
        assert_eq!(two.content, "second");
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn errors_when_queue_is_empty() {
        let provider = ScriptedProvider::new();
        let error = provider.generate(request("a")).await.unwrap_err();
        assert!(matches!(error, LLMError::Provider { .. }));
    }

    #[tokio::test]
    async fn streams_chunks_then_completes() {
        let provider = ScriptedProvider::new().with_chunks(["Hel", "lo"]);
        let mut stream = provider.stream(request("a")).await.unwrap();

        let mut tokens = Vec::new();
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                LLMStreamEvent::Token { delta } => tokens.push(delta),
                LLMStreamEvent::Completed => break,
            }
        }
        assert_eq!(tokens, vec!["Hel", "lo"]);
    }
}
