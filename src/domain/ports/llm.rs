use crate::domain::{errors::DomainError, ChatRequest};
use async_trait::async_trait;

#[async_trait]
pub trait LlmService: Send + Sync {
    /// Returns the assistant reply for the conversation.
    ///
    /// Timeouts and connection failures surface as `BackendUnavailable`.
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError>;
}
