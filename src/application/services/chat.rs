use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::application::services::{ContextComposer, RagService};
use crate::domain::{
    ports::LlmService, to_sources, ChatRequest, DomainError, Message, RetrievalResult,
    SamplingOptions, Source,
};
use crate::infrastructure::config::AnswerMode;

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: Message,
    pub sources: Vec<Source>,
}

/// Direct question answering and conversational chat over retrieved context.
pub struct ChatService {
    rag: Arc<RagService>,
    llm: Arc<dyn LlmService>,
    composer: ContextComposer,
    answer_mode: AnswerMode,
    temperature: f32,
}

impl ChatService {
    pub fn new(rag: Arc<RagService>, llm: Arc<dyn LlmService>, composer: ContextComposer) -> Self {
        Self {
            rag,
            llm,
            composer,
            answer_mode: AnswerMode::Generate,
            temperature: crate::domain::DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_answer_mode(mut self, answer_mode: AnswerMode) -> Self {
        self.answer_mode = answer_mode;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, query: &str, top_k: usize) -> Result<Answer, DomainError> {
        let results = self.rag.retrieve_top_k(query, top_k).await?;
        let sources = to_sources(&results);

        if results.is_empty() {
            return Ok(Answer {
                answer: self.composer.no_results_message().to_string(),
                sources,
            });
        }

        let answer = match self.answer_mode {
            AnswerMode::Context => self.composer.excerpt_answer(&results),
            AnswerMode::Generate => {
                let request = self.composer.qa_request(
                    &results,
                    query,
                    SamplingOptions {
                        temperature: self.temperature,
                        max_tokens: None,
                    },
                );
                self.llm.complete(&request).await?.trim().to_string()
            }
        };

        Ok(Answer { answer, sources })
    }

    /// Forwards the conversation, optionally grounded on the latest user turn.
    #[instrument(skip(self, request), fields(messages = request.messages.len()))]
    pub async fn chat(
        &self,
        mut request: ChatRequest,
        use_rag: bool,
    ) -> Result<ChatReply, DomainError> {
        if request.messages.is_empty() {
            return Err(DomainError::invalid_argument(
                "conversation must contain at least one message",
            ));
        }

        let mut sources = Vec::new();
        if use_rag {
            let results = self.context_for(&request).await?;
            self.composer.inject(&mut request, &results);
            sources = to_sources(&results);
        }

        let content = self.llm.complete(&request).await?;
        Ok(ChatReply {
            message: Message::assistant(content),
            sources,
        })
    }

    async fn context_for(&self, request: &ChatRequest) -> Result<Vec<RetrievalResult>, DomainError> {
        let Some(query) = request
            .last_user_message()
            .filter(|q| !q.trim().is_empty())
        else {
            tracing::debug!("no user message to ground on");
            return Ok(Vec::new());
        };

        match self.rag.retrieve(query).await {
            Ok(results) => Ok(results),
            Err(DomainError::IndexNotReady) => {
                tracing::warn!("index not ready, answering without retrieved context");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
