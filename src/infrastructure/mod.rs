pub mod bootstrap;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use bootstrap::{build_assistant, AssistantParts};
pub use config::{AnswerMode, AppConfig, Config, PromptsConfig};
pub use corpus::{DirectoryDocumentSource, InMemoryDocumentSource};
pub use embedding::{create_embedding_service, HashingEmbedding, OllamaEmbedding, OpenAiEmbedding};
pub use llm::{create_llm_service, OllamaLlm};
pub use vector_store::InMemoryVectorStore;
