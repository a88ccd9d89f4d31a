use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::DocumentSource, split_document, Chunk, ChunkerConfig, DocumentMetadata, DomainError,
};

/// The chunked corpus handed to an index build.
#[derive(Debug, Default)]
pub struct ChunkedCorpus {
    pub documents: usize,
    pub chunks: Vec<Chunk>,
    /// Documents skipped because they had no text.
    pub skipped: Vec<String>,
}

pub struct DocumentService {
    source: Arc<dyn DocumentSource>,
    chunker: ChunkerConfig,
}

impl DocumentService {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            source,
            chunker: ChunkerConfig::default(),
        }
    }

    pub fn with_chunker(source: Arc<dyn DocumentSource>, chunker: ChunkerConfig) -> Self {
        Self { source, chunker }
    }

    /// Loads every document and splits it; empty documents are logged and skipped.
    #[instrument(skip(self))]
    pub async fn load_chunks(&self) -> Result<ChunkedCorpus, DomainError> {
        let documents = self.source.load().await?;
        let mut corpus = ChunkedCorpus::default();

        for document in &documents {
            match split_document(document, &self.chunker) {
                Ok(chunks) => {
                    corpus.documents += 1;
                    corpus.chunks.extend(chunks);
                }
                Err(DomainError::EmptyDocument(name)) => {
                    tracing::warn!(file = %name, "skipping empty document");
                    corpus.skipped.push(name);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            documents = corpus.documents,
            chunks = corpus.chunks.len(),
            skipped = corpus.skipped.len(),
            "corpus chunked"
        );
        Ok(corpus)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<DocumentMetadata>, DomainError> {
        self.source.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;
    use crate::infrastructure::corpus::InMemoryDocumentSource;

    #[tokio::test]
    async fn test_load_chunks_skips_empty_documents() {
        let source = Arc::new(InMemoryDocumentSource::new(vec![
            Document::new("a.txt", "alpha ".repeat(300)),
            Document::new("blank.txt", "  "),
            Document::new("b.txt", "bravo"),
        ]));
        let service = DocumentService::with_chunker(source, ChunkerConfig::new(1024, 20).unwrap());

        let corpus = service.load_chunks().await.unwrap();

        assert_eq!(corpus.documents, 2);
        assert_eq!(corpus.skipped, vec!["blank.txt".to_string()]);
        assert_eq!(corpus.chunks.len(), 3);
        assert_eq!(corpus.chunks[2].source_filename, "b.txt");
    }

    #[tokio::test]
    async fn test_list_passes_metadata_through() {
        let source = Arc::new(InMemoryDocumentSource::new(vec![Document::new(
            "guide.md", "# hi",
        )]));
        let service = DocumentService::new(source);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_type, "MD");
        assert_eq!(listed[0].size_bytes, 4);
    }
}
