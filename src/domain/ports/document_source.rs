use async_trait::async_trait;

use crate::domain::{errors::DomainError, Document, DocumentMetadata};

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Loads the whole corpus, in a stable order.
    async fn load(&self) -> Result<Vec<Document>, DomainError>;
    async fn list(&self) -> Result<Vec<DocumentMetadata>, DomainError>;
}
