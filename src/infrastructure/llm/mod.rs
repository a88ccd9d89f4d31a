mod ollama;

use std::sync::Arc;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;

pub use ollama::OllamaLlm;

pub fn create_llm_service(config: &LlmConfig) -> Result<Arc<dyn LlmService>, DomainError> {
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaLlm::from_config(config)?)),
        other => Err(DomainError::invalid_argument(format!(
            "Unknown llm provider: {other}"
        ))),
    }
}
