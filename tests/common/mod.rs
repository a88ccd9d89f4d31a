#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use doc_assistant::application::Assistant;
use doc_assistant::domain::ports::{EmbeddingService, LlmService};
use doc_assistant::domain::{ChatRequest, Document, DomainError, Embedding};
use doc_assistant::infrastructure::{
    AnswerMode, AppConfig, AssistantParts, HashingEmbedding, InMemoryDocumentSource,
    InMemoryVectorStore,
};

/// Hashing embedder that counts calls and can be switched to fail or stall.
pub struct ProbeEmbedding {
    inner: HashingEmbedding,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub delay: Mutex<Option<Duration>>,
}

impl ProbeEmbedding {
    pub fn new() -> Self {
        Self {
            inner: HashingEmbedding::new(256).unwrap(),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn before_call(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::model_unavailable("probe embedder switched off"));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingService for ProbeEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.before_call().await?;
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        self.before_call().await?;
        self.inner.embed_batch(texts).await
    }

    fn model_name(&self) -> &str {
        "probe"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Records every request and answers with a fixed reply, or fails when offline.
pub struct RecordingLlm {
    pub requests: Mutex<Vec<ChatRequest>>,
    pub offline: AtomicBool,
}

impl RecordingLlm {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmService for RecordingLlm {
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DomainError::backend_unavailable("connection refused"));
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok("generated answer".to_string())
    }
}

pub struct Harness {
    pub assistant: Arc<Assistant>,
    pub embedding: Arc<ProbeEmbedding>,
    pub llm: Arc<RecordingLlm>,
    pub source: Arc<InMemoryDocumentSource>,
    pub config: AppConfig,
}

pub fn test_config(answer_mode: AnswerMode) -> AppConfig {
    let mut config = AppConfig::default();
    config.config.embedding.provider = "hashing".to_string();
    config.config.embedding.dimension = 256;
    config.config.embedding.batch_size = 4;
    config.config.rag.answer_mode = answer_mode;
    config
}

pub fn harness(documents: Vec<Document>) -> Harness {
    harness_with(documents, test_config(AnswerMode::Generate))
}

pub fn harness_with(documents: Vec<Document>, config: AppConfig) -> Harness {
    let embedding = Arc::new(ProbeEmbedding::new());
    let llm = Arc::new(RecordingLlm::new());
    let source = Arc::new(InMemoryDocumentSource::new(documents));

    let parts = AssistantParts {
        source: source.clone(),
        embedding: embedding.clone(),
        llm: llm.clone(),
        vector_store: Arc::new(InMemoryVectorStore::new()),
    };
    let assistant = Arc::new(parts.into_assistant(&config).unwrap());

    Harness {
        assistant,
        embedding,
        llm,
        source,
        config,
    }
}

/// Repeats `sentence` until the text is exactly `len` chars.
pub fn text_of_len(sentence: &str, len: usize) -> String {
    sentence.chars().cycle().take(len).collect()
}

pub fn sky_and_cooking() -> Vec<Document> {
    vec![
        Document::new(
            "a.txt",
            text_of_len("The sky color is blue during the day because sunlight scatters. ", 500),
        ),
        Document::new(
            "b.txt",
            text_of_len("Cooking pasta: boil salted water, add noodles, stir the sauce. ", 500),
        ),
    ]
}
