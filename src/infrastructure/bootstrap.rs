use std::sync::Arc;

use crate::application::{Assistant, ChatService, ContextComposer, DocumentService, RagService};
use crate::domain::{
    ports::{DocumentSource, EmbeddingService, LlmService, VectorStore},
    DomainError,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::{
    create_embedding_service, create_llm_service, DirectoryDocumentSource, InMemoryVectorStore,
};

/// The adapters an [`Assistant`] is wired from.
pub struct AssistantParts {
    pub source: Arc<dyn DocumentSource>,
    pub embedding: Arc<dyn EmbeddingService>,
    pub llm: Arc<dyn LlmService>,
    pub vector_store: Arc<dyn VectorStore>,
}

impl AssistantParts {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            source: Arc::new(DirectoryDocumentSource::from_config(&config.config.corpus)),
            embedding: create_embedding_service(&config.config.embedding)?,
            llm: create_llm_service(&config.config.llm)?,
            vector_store: Arc::new(InMemoryVectorStore::new()),
        })
    }

    pub fn into_assistant(self, config: &AppConfig) -> Result<Assistant, DomainError> {
        let cfg = &config.config;

        let documents = DocumentService::with_chunker(self.source, cfg.rag.chunker()?);
        let rag = Arc::new(
            RagService::new(self.embedding, self.vector_store, cfg.rag.top_k)
                .with_excerpt_chars(cfg.rag.excerpt_chars)
                .with_batch_size(cfg.embedding.batch_size),
        );
        let chat = ChatService::new(
            rag.clone(),
            self.llm,
            ContextComposer::new(config.prompts.rag.clone()),
        )
        .with_answer_mode(cfg.rag.answer_mode)
        .with_temperature(cfg.llm.temperature);

        Ok(Assistant::new(documents, rag, chat))
    }
}

/// Wires the configured adapters into an [`Assistant`] with an empty index.
pub fn build_assistant(config: &AppConfig) -> Result<Assistant, DomainError> {
    AssistantParts::from_config(config)?.into_assistant(config)
}
