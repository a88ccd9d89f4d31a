mod hashing;
#[cfg(feature = "local-embeddings")]
mod local;
mod ollama;
mod openai;

use std::sync::Arc;

use crate::domain::{ports::EmbeddingService, DomainError};
use crate::infrastructure::config::EmbeddingConfig;

pub use hashing::HashingEmbedding;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedding;
pub use ollama::OllamaEmbedding;
pub use openai::OpenAiEmbedding;

/// Builds the embedder named by `embedding.provider`.
///
/// The returned instance must serve both index builds and queries.
pub fn create_embedding_service(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingService>, DomainError> {
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedding::from_config(config)?)),
        "openai" => Ok(Arc::new(OpenAiEmbedding::from_config(config)?)),
        "hashing" => Ok(Arc::new(HashingEmbedding::new(config.dimension)?)),
        #[cfg(feature = "local-embeddings")]
        "local" => Ok(Arc::new(LocalEmbedding::from_config(config)?)),
        #[cfg(not(feature = "local-embeddings"))]
        "local" => Err(DomainError::model_unavailable(
            "local embeddings require the `local-embeddings` feature",
        )),
        other => Err(DomainError::model_unavailable(format!(
            "Unknown embedding provider: {other}"
        ))),
    }
}
