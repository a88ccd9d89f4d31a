use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{
    ChunkerConfig, DomainError, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_EXCERPT_CHARS,
    DEFAULT_TEMPERATURE,
};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Everything the binaries need, built once at startup and passed down.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Loads `APP_CONFIG` (or `config/default.yaml`) and applies env overrides.
    ///
    /// A missing file at the default path falls back to built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("APP_CONFIG").ok();
        let path = PathBuf::from(explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

        let mut config = if explicit.is_some() || path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    fn apply_env(&mut self) {
        let cfg = &mut self.config;
        override_from_env("SERVER_HOST", &mut cfg.server.host);
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse().ok()) {
            cfg.server.port = port;
        }
        if let Ok(path) = std::env::var("DOCS_PATH") {
            cfg.corpus.docs_path = PathBuf::from(path);
        }
        override_from_env("OLLAMA_URL", &mut cfg.llm.base_url);
        override_from_env("LLM_MODEL", &mut cfg.llm.model);
        override_from_env("EMBEDDING_PROVIDER", &mut cfg.embedding.provider);
        override_from_env("EMBEDDING_MODEL", &mut cfg.embedding.model);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rag = &self.config.rag;
        rag.chunker().map_err(|e| ConfigError::Invalid {
            key: "rag.chunk_size/rag.overlap".into(),
            reason: e.to_string(),
        })?;
        if rag.top_k == 0 {
            return Err(ConfigError::Invalid {
                key: "rag.top_k".into(),
                reason: "must be positive".into(),
            });
        }
        if self.config.llm.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "llm.timeout_seconds".into(),
                reason: "must be positive".into(),
            });
        }
        if self.config.embedding.batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "embedding.batch_size".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

fn override_from_env(key: &str, target: &mut String) {
    if let Ok(value) = std::env::var(key) {
        if !value.trim().is_empty() {
            *target = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
    pub corpus: CorpusConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            timeout_seconds: 120,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// One of `ollama`, `openai`, `hashing`, `local`.
    pub provider: String,
    pub model: String,
    pub dimension: usize,
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub timeout_seconds: u64,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimension: 768,
            base_url: "http://localhost:11434".to_string(),
            cache_dir: PathBuf::from(".cache/embeddings"),
            timeout_seconds: 60,
            batch_size: 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Return the concatenated excerpts as the answer.
    Context,
    /// Ask the language model to answer from the retrieved context.
    Generate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub top_k: usize,
    pub excerpt_chars: usize,
    pub answer_mode: AnswerMode,
}

impl RagConfig {
    pub fn chunker(&self) -> Result<ChunkerConfig, DomainError> {
        ChunkerConfig::new(self.chunk_size, self.overlap)
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: 3,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            answer_mode: AnswerMode::Generate,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub docs_path: PathBuf,
    pub extensions: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            docs_path: PathBuf::from("docs"),
            extensions: ["txt", "md", "markdown", "rst", "csv", "json", "html"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub rag: RagPrompts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    /// Uses `{context}` and `{query}` placeholders.
    pub qa_template: String,
    /// Uses a `{context}` placeholder.
    pub chat_context_template: String,
    pub no_results_message: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful assistant that answers questions using the user's documents. \
                     If the documents do not contain the answer, say so."
                .to_string(),
            qa_template: "Context information is below.\n\
                          ---------------------\n\
                          {context}\n\
                          ---------------------\n\
                          Given the context information and not prior knowledge, answer the query.\n\
                          Query: {query}\n\
                          Answer: "
                .to_string(),
            chat_context_template:
                "Use the following excerpts from the user's documents when they are relevant:\n{context}"
                    .to_string(),
            no_results_message: "No relevant documents found.".to_string(),
        }
    }
}
