mod conversation;
mod document;
mod embedding;
mod index;
mod retrieval;

pub use conversation::{ChatRequest, Message, MessageRole, SamplingOptions, DEFAULT_TEMPERATURE};
pub use document::{
    split_document, Chunk, ChunkerConfig, Document, DocumentMetadata, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE,
};
pub use embedding::Embedding;
pub use index::{IndexEntry, IndexSnapshot};
pub use retrieval::{excerpt, to_sources, RetrievalResult, Source, DEFAULT_EXCERPT_CHARS};
