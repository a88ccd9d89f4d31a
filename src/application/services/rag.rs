use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    Chunk, DomainError, IndexEntry, IndexSnapshot, RetrievalResult, DEFAULT_EXCERPT_CHARS,
};

/// Builds snapshots and answers similarity queries against the published one.
pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
    excerpt_chars: usize,
    batch_size: usize,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            batch_size: 32,
        }
    }

    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub fn embedding_model(&self) -> &str {
        self.embedding.model_name()
    }

    #[instrument(skip(self), fields(top_k = self.default_top_k))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalResult>, DomainError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    /// Embeds `query` and ranks it against the current snapshot.
    ///
    /// Input is validated before the embedder or index is touched.
    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, DomainError> {
        if top_k == 0 {
            return Err(DomainError::invalid_argument("top_k must be a positive integer"));
        }
        if query.trim().is_empty() {
            return Err(DomainError::invalid_query("query must not be empty"));
        }

        let snapshot = self.vector_store.current()?;
        let embedding = self.embedding.embed(query).await?;
        let results = snapshot.search(&embedding, top_k, self.excerpt_chars)?;

        tracing::debug!(
            version = snapshot.version(),
            results = results.len(),
            "retrieved"
        );
        Ok(results)
    }

    /// Embeds every chunk into a new, unpublished snapshot.
    ///
    /// Nothing is published here; a failure leaves the current snapshot alone.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn build_index(&self, chunks: Vec<Chunk>) -> Result<IndexSnapshot, DomainError> {
        if chunks.is_empty() {
            return Err(DomainError::EmptyCorpus);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        let mut remaining = chunks.into_iter().peekable();

        while remaining.peek().is_some() {
            let batch: Vec<Chunk> = remaining.by_ref().take(self.batch_size).collect();
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();

            let embeddings = self
                .embedding
                .embed_batch(&texts)
                .await
                .map_err(DomainError::index_build)?;

            if embeddings.len() != batch.len() {
                return Err(DomainError::index_build(DomainError::model_unavailable(
                    format!(
                        "embedder returned {} vectors for {} chunks",
                        embeddings.len(),
                        batch.len()
                    ),
                )));
            }

            entries.extend(
                batch
                    .into_iter()
                    .zip(embeddings)
                    .map(|(chunk, embedding)| IndexEntry { chunk, embedding }),
            );
        }

        IndexSnapshot::new(self.vector_store.next_version(), entries).map_err(|e| match e {
            DomainError::EmptyCorpus => DomainError::EmptyCorpus,
            other => DomainError::index_build(other),
        })
    }

    /// Builds a snapshot and publishes it with a single pointer swap.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn rebuild(&self, chunks: Vec<Chunk>) -> Result<Arc<IndexSnapshot>, DomainError> {
        let snapshot = self.build_index(chunks).await?;
        let published = self.vector_store.publish(snapshot)?;

        tracing::info!(
            version = published.version(),
            chunks = published.len(),
            documents = published.document_count(),
            "index snapshot published"
        );
        Ok(published)
    }

    pub fn current(&self) -> Result<Arc<IndexSnapshot>, DomainError> {
        self.vector_store.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{split_document, ChunkerConfig, Document, Embedding};
    use crate::infrastructure::{HashingEmbedding, InMemoryVectorStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingEmbedding {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingService for FailingEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::model_unavailable("model offline"))
        }

        async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::model_unavailable("model offline"))
        }

        fn model_name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            8
        }
    }

    struct NanEmbedding;

    #[async_trait]
    impl EmbeddingService for NanEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![f32::NAN; 4]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            Ok(texts.iter().map(|_| Embedding::new(vec![f32::NAN; 4])).collect())
        }

        fn model_name(&self) -> &str {
            "nan"
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    fn chunks(name: &str, text: &str) -> Vec<Chunk> {
        split_document(&Document::new(name, text), &ChunkerConfig::default()).unwrap()
    }

    fn service() -> RagService {
        RagService::new(
            Arc::new(HashingEmbedding::new(256).unwrap()),
            Arc::new(InMemoryVectorStore::new()),
            3,
        )
        .with_batch_size(2)
    }

    #[tokio::test]
    async fn test_retrieve_before_build_is_not_ready() {
        let err = service().retrieve("anything").await.unwrap_err();
        assert!(matches!(err, DomainError::IndexNotReady));
    }

    #[tokio::test]
    async fn test_rebuild_then_retrieve() {
        let rag = service();
        let mut all = chunks("a.txt", "The sky color is blue on a clear day.");
        all.extend(chunks("b.txt", "Dice the onions and fry them in butter."));
        all.extend(chunks("c.txt", "Rivers flow into the ocean."));

        let snapshot = rag.rebuild(all).await.unwrap();
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.len(), 3);

        let results = rag.retrieve_top_k("what color is the sky", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_filename, "a.txt");
    }

    #[tokio::test]
    async fn test_rejects_bad_input_without_embedding() {
        let failing = Arc::new(FailingEmbedding {
            calls: AtomicUsize::new(0),
        });
        let rag = RagService::new(failing.clone(), Arc::new(InMemoryVectorStore::new()), 3);

        assert!(matches!(
            rag.retrieve_top_k("   ", 3).await,
            Err(DomainError::InvalidQuery(_))
        ));
        assert!(matches!(
            rag.retrieve_top_k("sky", 0).await,
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_empty_is_empty_corpus() {
        assert!(matches!(
            service().build_index(vec![]).await,
            Err(DomainError::EmptyCorpus)
        ));
    }

    #[tokio::test]
    async fn test_failed_build_keeps_previous_snapshot() {
        let store = Arc::new(InMemoryVectorStore::new());
        let good = RagService::new(
            Arc::new(HashingEmbedding::new(64).unwrap()),
            store.clone(),
            3,
        );
        good.rebuild(chunks("a.txt", "first corpus")).await.unwrap();

        let bad = RagService::new(
            Arc::new(FailingEmbedding {
                calls: AtomicUsize::new(0),
            }),
            store.clone(),
            3,
        );
        let err = bad.rebuild(chunks("b.txt", "second corpus")).await.unwrap_err();

        assert!(matches!(err, DomainError::IndexBuild(_)));
        let current = store.current().unwrap();
        assert_eq!(current.version(), 1);
        assert_eq!(current.entries()[0].chunk.source_filename, "a.txt");
    }

    #[tokio::test]
    async fn test_non_finite_embeddings_fail_the_build() {
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = RagService::new(Arc::new(NanEmbedding), store.clone(), 3);

        let err = rag.rebuild(chunks("a.txt", "some text")).await.unwrap_err();

        match err {
            DomainError::IndexBuild(cause) => {
                assert!(matches!(*cause, DomainError::ModelUnavailable(_)))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(store.current(), Err(DomainError::IndexNotReady)));
    }
}
