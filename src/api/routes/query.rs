use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::{error::ApiError, state::AppState};
use crate::application::Answer;
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub top_k: Option<i64>,
}

/// Maps the wire value to a positive count; absent means the configured default.
fn parse_top_k(top_k: Option<i64>) -> Result<Option<usize>, DomainError> {
    match top_k {
        None => Ok(None),
        Some(k) if k > 0 => usize::try_from(k)
            .map(Some)
            .map_err(|_| DomainError::invalid_argument("top_k is too large")),
        Some(k) => Err(DomainError::invalid_argument(format!(
            "top_k must be a positive integer, got {k}"
        ))),
    }
}

async fn run(state: &AppState, request: QueryRequest) -> Result<Json<Answer>, ApiError> {
    let top_k = parse_top_k(request.top_k)?;
    let answer = state.assistant.query(&request.query, top_k).await?;
    Ok(Json(answer))
}

pub async fn query_get(
    State(state): State<AppState>,
    Query(request): Query<QueryRequest>,
) -> Result<Json<Answer>, ApiError> {
    run(&state, request).await
}

pub async fn query_post(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Answer>, ApiError> {
    run(&state, request).await
}
