use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingsBuilder;
use rig::providers::openai;
use std::time::Duration;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// OpenAI embeddings through `rig`. Needs `OPENAI_API_KEY`.
pub struct OpenAiEmbedding {
    client: openai::Client,
    model: String,
    dimension: usize,
    timeout: Duration,
}

impl OpenAiEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, DomainError> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(DomainError::model_unavailable(
                    "OPENAI_API_KEY environment variable not set",
                ))
            }
        }

        Ok(Self {
            client: openai::Client::from_env(),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        let mut builder = EmbeddingsBuilder::new(self.client.embedding_model(&self.model));
        for text in texts {
            builder = builder
                .document(*text)
                .map_err(|e| DomainError::model_unavailable(e.to_string()))?;
        }

        let embeddings = builder
            .build()
            .await
            .map_err(|e| DomainError::model_unavailable(format!("OpenAI embedding failed: {e}")))?;

        Ok(embeddings
            .into_iter()
            .map(|(_text, emb)| {
                Embedding::new(emb.first().vec.into_iter().map(|x| x as f32).collect())
            })
            .collect())
    }
}

async fn within<T>(
    timeout: Duration,
    call: impl std::future::Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    tokio::time::timeout(timeout, call).await.map_err(|_| {
        DomainError::model_unavailable(format!(
            "OpenAI embeddings did not answer within {}s",
            timeout.as_secs()
        ))
    })?
}

/// Checks a provider response against the request and the configured dimension.
fn check_batch(
    embeddings: &[Embedding],
    inputs: usize,
    dimension: usize,
) -> Result<(), DomainError> {
    if embeddings.len() != inputs {
        return Err(DomainError::model_unavailable(format!(
            "OpenAI returned {} embeddings for {inputs} inputs",
            embeddings.len()
        )));
    }
    if let Some(bad) = embeddings.iter().find(|e| e.dimension() != dimension) {
        return Err(DomainError::model_unavailable(format!(
            "OpenAI returned a {}-dimensional embedding, expected {dimension}",
            bad.dimension()
        )));
    }
    Ok(())
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::model_unavailable("OpenAI returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(model = %self.model, inputs = texts.len(), "calling openai embeddings");

        let embeddings = within(self.timeout, self.request(texts)).await?;

        check_batch(&embeddings, texts.len(), self.dimension)?;
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
