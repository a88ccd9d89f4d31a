use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::DomainError;

/// Domain failures rendered as JSON with a status the caller can act on.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    retryable: bool,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            DomainError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
            DomainError::EmptyDocument(_) => (StatusCode::BAD_REQUEST, "empty_document"),
            DomainError::EmptyCorpus => (StatusCode::UNPROCESSABLE_ENTITY, "empty_corpus"),
            DomainError::IndexNotReady => (StatusCode::SERVICE_UNAVAILABLE, "index_not_ready"),
            DomainError::BackendUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable")
            }
            DomainError::ModelUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
            }
            DomainError::IndexBuild(_) => (StatusCode::INTERNAL_SERVER_ERROR, "index_build"),
            DomainError::Retrieval(_) => (StatusCode::INTERNAL_SERVER_ERROR, "retrieval"),
            DomainError::Corpus(_) => (StatusCode::INTERNAL_SERVER_ERROR, "corpus"),
            DomainError::ExternalService(_) => (StatusCode::BAD_GATEWAY, "external_service"),
            DomainError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!(error = %self.0, kind, "request failed");
        } else {
            tracing::debug!(error = %self.0, kind, "request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            kind,
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}
