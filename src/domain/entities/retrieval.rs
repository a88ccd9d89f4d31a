use serde::{Deserialize, Serialize};

pub const DEFAULT_EXCERPT_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// One ranked hit, in the shape every consumer (API, CLI, prompts) relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub source_filename: String,
    pub similarity_score: f32,
    pub excerpt: String,
    /// Full chunk text, used to ground prompts.
    #[serde(skip)]
    pub text: String,
}

impl RetrievalResult {
    pub fn new(
        source_filename: impl Into<String>,
        similarity_score: f32,
        text: &str,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            source_filename: source_filename.into(),
            similarity_score,
            excerpt: excerpt(text, excerpt_chars),
            text: text.to_string(),
        }
    }
}

/// Citation entry returned alongside answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub filename: String,
    pub score: f32,
    pub excerpt: String,
}

impl From<&RetrievalResult> for Source {
    fn from(result: &RetrievalResult) -> Self {
        Self {
            filename: result.source_filename.clone(),
            score: result.similarity_score,
            excerpt: result.excerpt.clone(),
        }
    }
}

pub fn to_sources(results: &[RetrievalResult]) -> Vec<Source> {
    results.iter().map(Source::from).collect()
}

/// First `max_chars` chars of `text`, with `...` appended when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
