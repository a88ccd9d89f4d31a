use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::DocumentSource, Document, DocumentMetadata, DomainError};

/// Corpus held in memory; replaced wholesale with [`InMemoryDocumentSource::replace`].
pub struct InMemoryDocumentSource {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub fn replace(&self, documents: Vec<Document>) -> Result<(), DomainError> {
        let mut store = self
            .documents
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        *store = documents;
        Ok(())
    }
}

impl Default for InMemoryDocumentSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn load(&self) -> Result<Vec<Document>, DomainError> {
        let store = self
            .documents
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(store.clone())
    }

    async fn list(&self) -> Result<Vec<DocumentMetadata>, DomainError> {
        let store = self
            .documents
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(store.iter().map(|d| d.metadata.clone()).collect())
    }
}
