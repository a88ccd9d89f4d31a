use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{ports::LlmService, ChatRequest, DomainError, Message};
use crate::infrastructure::config::LlmConfig;

/// Chat completions from Ollama (`POST /api/chat`, non-streaming).
pub struct OllamaLlm {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Message,
}

impl OllamaLlm {
    pub fn from_config(config: &LlmConfig) -> Result<Self, DomainError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
        })
    }

    fn body<'a>(&'a self, request: &'a ChatRequest) -> ChatBody<'a> {
        ChatBody {
            model: &self.model,
            messages: &request.messages,
            stream: false,
            options: ChatOptions {
                temperature: request.options.temperature,
                num_predict: request.options.max_tokens,
            },
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<String, DomainError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&self.body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::backend_unavailable(format!(
                        "Ollama did not answer within {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    DomainError::backend_unavailable(format!("Failed to reach Ollama at {url}: {e}"))
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::backend_unavailable(format!(
                "Ollama error {status}: {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::external(format!("Ollama error {status}: {body}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::backend_unavailable("Ollama response body timed out")
            } else {
                DomainError::external(format!("Invalid Ollama response: {e}"))
            }
        })?;

        if parsed.message.content.trim().is_empty() {
            return Err(DomainError::external("Ollama returned an empty answer"));
        }
        Ok(parsed.message.content)
    }
}

#[async_trait]
impl LlmService for OllamaLlm {
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError> {
        tracing::debug!(model = %self.model, messages = request.messages.len(), "calling ollama");

        tokio::time::timeout(self.timeout, self.send(request))
            .await
            .map_err(|_| {
                DomainError::backend_unavailable(format!(
                    "Ollama did not answer within {}s",
                    self.timeout.as_secs()
                ))
            })?
    }
}
