use axum::{extract::State, Json};

use crate::api::{error::ApiError, state::AppState};
use crate::application::{IndexReport, IndexStatus};

pub async fn index_status(State(state): State<AppState>) -> Json<IndexStatus> {
    Json(state.assistant.index_status())
}

/// Full-corpus rebuild; the current snapshot serves until the new one is published.
pub async fn rebuild_index(
    State(state): State<AppState>,
) -> Result<Json<IndexReport>, ApiError> {
    Ok(Json(state.assistant.ingest_and_index().await?))
}
