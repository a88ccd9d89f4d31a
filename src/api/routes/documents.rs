use axum::{extract::State, Json};

use crate::api::{error::ApiError, state::AppState};
use crate::domain::DocumentMetadata;

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentMetadata>>, ApiError> {
    Ok(Json(state.assistant.list_documents().await?))
}
