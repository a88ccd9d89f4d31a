use crate::domain::{ChatRequest, Message, RetrievalResult, SamplingOptions};
use crate::infrastructure::config::RagPrompts;

/// Turns ranked results into prompt text.
#[derive(Debug, Clone)]
pub struct ContextComposer {
    prompts: RagPrompts,
}

impl ContextComposer {
    pub fn new(prompts: RagPrompts) -> Self {
        Self { prompts }
    }

    pub fn no_results_message(&self) -> &str {
        &self.prompts.no_results_message
    }

    /// Numbered full-text passages with their source file.
    pub fn context_block(&self, results: &[RetrievalResult]) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}\n{}", i + 1, r.source_filename, r.text.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The answer returned when no language model is involved.
    pub fn excerpt_answer(&self, results: &[RetrievalResult]) -> String {
        results
            .iter()
            .map(|r| r.excerpt.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn qa_request(
        &self,
        results: &[RetrievalResult],
        query: &str,
        options: SamplingOptions,
    ) -> ChatRequest {
        let prompt = self
            .prompts
            .qa_template
            .replace("{context}", &self.context_block(results))
            .replace("{query}", query.trim());

        ChatRequest::new(vec![
            Message::system(self.prompts.system.clone()),
            Message::user(prompt),
        ])
        .with_options(options)
    }

    /// Adds retrieved passages to the conversation's system message.
    pub fn inject(&self, request: &mut ChatRequest, results: &[RetrievalResult]) {
        if results.is_empty() {
            return;
        }
        let context = self
            .prompts
            .chat_context_template
            .replace("{context}", &self.context_block(results));
        request.inject_system_context(&context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageRole;

    fn results() -> Vec<RetrievalResult> {
        vec![
            RetrievalResult::new("a.txt", 0.9, "The sky is blue.", 200),
            RetrievalResult::new("b.txt", 0.4, &"x".repeat(300), 200),
        ]
    }

    #[test]
    fn test_context_block_numbers_sources() {
        let composer = ContextComposer::new(RagPrompts::default());
        let block = composer.context_block(&results());

        assert!(block.starts_with("[1] a.txt\nThe sky is blue."));
        assert!(block.contains("[2] b.txt\n"));
    }

    #[test]
    fn test_excerpt_answer_uses_truncated_excerpts() {
        let composer = ContextComposer::new(RagPrompts::default());
        let answer = composer.excerpt_answer(&results());

        assert!(answer.starts_with("The sky is blue.\n\n"));
        assert!(answer.ends_with("..."));
    }

    #[test]
    fn test_qa_request_fills_template() {
        let composer = ContextComposer::new(RagPrompts::default());
        let request = composer.qa_request(&results(), " why blue? ", SamplingOptions::default());

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        let prompt = &request.messages[1].content;
        assert!(prompt.contains("The sky is blue."));
        assert!(prompt.contains("Query: why blue?"));
        assert!(!prompt.contains("{context}"));
    }

    #[test]
    fn test_inject_with_no_results_is_noop() {
        let composer = ContextComposer::new(RagPrompts::default());
        let mut request = ChatRequest::new(vec![Message::user("hi")]);
        composer.inject(&mut request, &[]);
        assert_eq!(request.messages.len(), 1);
    }
}
