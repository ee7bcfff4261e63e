//! Gemini HTTP provider: `generateContent` for single-shot and JSON-mode
//! calls, `streamGenerateContent?alt=sse` for streaming.

use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;

use crate::config::constants::urls;
use crate::gemini::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::llm::provider::{LLMError, LLMProvider, LLMRequest, LLMResponse, LLMStream,
    LLMStreamEvent};

pub struct GeminiProvider {
    api_key: Arc<str>,
    http_client: HttpClient,
    base_url: Arc<str>,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, urls::GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key: Arc::from(api_key.as_str()),
            http_client: HttpClient::new(),
            base_url: Arc::from(base_url.as_str()),
        }
    }

    fn convert_request(request: &LLMRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::text(request.prompt.clone())];
        if let Some(image) = &request.image {
            parts.push(Part::from(image));
        }
        GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: request
                .response_schema
                .clone()
                .map(GenerationConfig::json),
        }
    }

    fn handle_http_error(status: StatusCode, error_text: &str) -> LLMError {
        LLMError::Provider {
            message: format!("Gemini HTTP {}: {}", status, error_text.trim()),
        }
    }

    async fn post(
        &self,
        url: String,
        body: &GenerateContentRequest,
    ) -> Result<reqwest::Response, LLMError> {
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| LLMError::Provider {
                message: format!("Gemini network error: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::handle_http_error(status, &error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        let body = Self::convert_request(&request);
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let response = self.post(url, &body).await?;
        let payload: GenerateContentResponse =
            response.json().await.map_err(|e| LLMError::Provider {
                message: format!("Gemini response was not valid JSON: {e}"),
            })?;

        Ok(LLMResponse {
            content: payload.text().unwrap_or_default(),
            model: request.model,
        })
    }

    async fn stream(&self, request: LLMRequest) -> Result<LLMStream, LLMError> {
        let body = Self::convert_request(&request);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, request.model
        );

        let response = self.post(url, &body).await?;
        let mut bytes = response.bytes_stream();

        // Server-sent events: one `data: {json}` line per chunk. The buffer
        // carries partial lines across network reads.
        let stream = try_stream! {
            let mut buffer = String::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| LLMError::Provider {
                    message: format!("Gemini stream interrupted: {e}"),
                })?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    if let Some(delta) = decode_sse_line(line.trim())? {
                        if !delta.is_empty() {
                            yield LLMStreamEvent::Token { delta };
                        }
                    }
                }
            }
            if let Some(delta) = decode_sse_line(buffer.trim())? {
                if !delta.is_empty() {
                    yield LLMStreamEvent::Token { delta };
                }
            }
            yield LLMStreamEvent::Completed;
        };

        Ok(Box::pin(stream))
    }
}

/// Decode one SSE line into the text delta it carries, if any.
fn decode_sse_line(line: &str) -> Result<Option<String>, LLMError> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }
    let parsed: GenerateContentResponse =
        serde_json::from_str(payload).map_err(|e| LLMError::Provider {
            message: format!("Gemini stream chunk was not valid JSON: {e}"),
        })?;
    Ok(parsed.text())
}
