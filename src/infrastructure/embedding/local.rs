use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// fastembed ONNX model, downloaded once into `embedding.cache_dir`.
pub struct LocalEmbedding {
    model: Arc<Mutex<fastembed::TextEmbedding>>,
    model_name: String,
    dimension: usize,
    batch_size: usize,
}

fn resolve_model(name: &str) -> Result<(fastembed::EmbeddingModel, usize), DomainError> {
    match name {
        "all-minilm-l6-v2" => Ok((fastembed::EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((fastembed::EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" => Ok((fastembed::EmbeddingModel::BGEBaseENV15, 768)),
        "nomic-embed-text-v1.5" => Ok((fastembed::EmbeddingModel::NomicEmbedTextV15, 768)),
        other => Err(DomainError::model_unavailable(format!(
            "Unknown local embedding model '{other}'"
        ))),
    }
}

impl LocalEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, DomainError> {
        let (model, dimension) = resolve_model(&config.model)?;
        let embedding = fastembed::TextEmbedding::try_new(
            fastembed::InitOptions::new(model)
                .with_cache_dir(config.cache_dir.clone())
                .with_show_download_progress(false),
        )
        .map_err(|e| DomainError::model_unavailable(format!("Failed to load local model: {e}")))?;

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: config.model.clone(),
            dimension,
            batch_size: config.batch_size,
        })
    }
}

#[async_trait]
impl EmbeddingService for LocalEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::model_unavailable("Local model returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let batch_size = self.batch_size;
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();

        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| DomainError::internal(e.to_string()))?;
            model
                .embed(texts, Some(batch_size))
                .map_err(|e| DomainError::model_unavailable(format!("Local embedding failed: {e}")))
        })
        .await
        .map_err(|e| DomainError::internal(e.to_string()))??;

        Ok(vectors.into_iter().map(Embedding::new).collect())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
