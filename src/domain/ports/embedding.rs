use crate::domain::{errors::DomainError, Embedding};
use async_trait::async_trait;

/// Maps text into a fixed vector space.
///
/// `embed_batch` must return exactly one vector per input, in input order,
/// identical to what `embed` would return for each text.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError>;
    fn model_name(&self) -> &str;
    fn dimension(&self) -> usize;
}
