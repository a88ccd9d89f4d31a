use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    #[error("Corpus contains no indexable documents")]
    EmptyCorpus,

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Index build failed: {0}")]
    IndexBuild(#[source] Box<DomainError>),

    #[error("Index not ready: no snapshot has been published yet")]
    IndexNotReady,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Language model backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn empty_document(msg: impl Into<String>) -> Self {
        Self::EmptyDocument(msg.into())
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn index_build(cause: DomainError) -> Self {
        Self::IndexBuild(Box::new(cause))
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::Corpus(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Failures a caller may retry later without changing its input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_) | Self::ModelUnavailable(_))
    }

    /// Caller input problems, detected before touching the embedder or index.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
