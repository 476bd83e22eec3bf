//! Generation oracle boundary
//!
//! The oracle is any text-completion service: one prompt in, one completion
//! out. [`OllamaOracle`] talks to a local Ollama server; tests substitute
//! their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Longest slice of an error body kept in a [`GenerationError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 320;

/// Opaque text-completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Complete a prompt
    ///
    /// One call, no retry. Blocks for as long as the service takes.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[async_trait]
impl<O: Oracle + ?Sized> Oracle for std::sync::Arc<O> {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).complete(prompt).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessageRef<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessageRef<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Oracle backed by Ollama's `/api/chat` endpoint
#[derive(Debug, Clone)]
pub struct OllamaOracle {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaOracle {
    /// Create oracle for `model` served at `endpoint` (e.g. `http://localhost:11434`)
    ///
    /// The HTTP client has no request timeout; bound latency externally.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, model)
    }

    /// Create oracle with a preconfigured HTTP client
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Get model identifier
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get chat URL
    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Oracle for OllamaOracle {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessageRef {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        tracing::debug!("Sending {} byte prompt to {}", prompt.len(), self.model);

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Ok(body.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_trims_trailing_slash() {
        let oracle = OllamaOracle::new("http://localhost:11434/", "qwen2.5-coder");
        assert_eq!(oracle.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(oracle.model(), "qwen2.5-coder");
    }

    #[test]
    fn request_wire_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [ChatMessageRef {
                role: "user",
                content: "hello",
            }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "messages": [{"role": "user", "content": "hello"}],
                "stream": false
            })
        );
    }

    #[test]
    fn response_ignores_extra_fields() {
        let body = r#"{"model":"m","message":{"role":"assistant","content":"ok"},"done":true}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.content, "ok");
    }
}
