use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::{error::ApiError, state::AppState};
use crate::domain::{Message, SamplingOptions, Source};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub use_rag: bool,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
    pub sources: Vec<Source>,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let options = SamplingOptions {
        temperature: request
            .temperature
            .unwrap_or(state.config.config.llm.temperature),
        max_tokens: request.max_tokens,
    };

    let reply = state
        .assistant
        .chat(request.messages, request.use_rag, options)
        .await?;

    Ok(Json(ChatResponse {
        content: reply.message.content,
        sources: reply.sources,
    }))
}
