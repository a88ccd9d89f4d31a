use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::application::services::{Answer, ChatReply, ChatService, DocumentService, RagService};
use crate::domain::{ChatRequest, DocumentMetadata, DomainError, Message, SamplingOptions};

#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub version: u64,
    pub documents: usize,
    pub chunks: usize,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub ready: bool,
    pub version: Option<u64>,
    pub documents: usize,
    pub chunks: usize,
    pub built_at: Option<DateTime<Utc>>,
    pub embedding_model: String,
}

/// Entry point for the API and CLI layers.
///
/// Reads run concurrently against the published snapshot; rebuilds are
/// serialized so snapshots publish in build order.
pub struct Assistant {
    documents: DocumentService,
    rag: Arc<RagService>,
    chat: ChatService,
    rebuild_lock: Mutex<()>,
}

impl Assistant {
    pub fn new(documents: DocumentService, rag: Arc<RagService>, chat: ChatService) -> Self {
        Self {
            documents,
            rag,
            chat,
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Re-reads the whole corpus and publishes a fresh snapshot.
    ///
    /// On any error the previously published snapshot keeps serving.
    #[instrument(skip(self))]
    pub async fn ingest_and_index(&self) -> Result<IndexReport, DomainError> {
        let _guard = self.rebuild_lock.lock().await;

        let corpus = self.documents.load_chunks().await?;
        if corpus.chunks.is_empty() {
            tracing::warn!(skipped = corpus.skipped.len(), "rebuild aborted: empty corpus");
            return Err(DomainError::EmptyCorpus);
        }

        let snapshot = self.rag.rebuild(corpus.chunks).await?;
        Ok(IndexReport {
            version: snapshot.version(),
            documents: corpus.documents,
            chunks: snapshot.len(),
            skipped: corpus.skipped,
        })
    }

    pub async fn query(&self, text: &str, top_k: Option<usize>) -> Result<Answer, DomainError> {
        self.chat
            .answer(text, top_k.unwrap_or(self.rag.default_top_k()))
            .await
    }

    pub async fn chat(
        &self,
        messages: Vec<Message>,
        use_rag: bool,
        options: SamplingOptions,
    ) -> Result<ChatReply, DomainError> {
        self.chat
            .chat(ChatRequest::new(messages).with_options(options), use_rag)
            .await
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentMetadata>, DomainError> {
        self.documents.list().await
    }

    pub fn index_status(&self) -> IndexStatus {
        let embedding_model = self.rag.embedding_model().to_string();
        match self.rag.current() {
            Ok(snapshot) => IndexStatus {
                ready: true,
                version: Some(snapshot.version()),
                documents: snapshot.document_count(),
                chunks: snapshot.len(),
                built_at: Some(snapshot.built_at()),
                embedding_model,
            },
            Err(_) => IndexStatus {
                ready: false,
                version: None,
                documents: 0,
                chunks: 0,
                built_at: None,
                embedding_model,
            },
        }
    }
}
