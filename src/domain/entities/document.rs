use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub raw_text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(filename: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let filename = filename.into();
        let raw_text = raw_text.into();
        let metadata = DocumentMetadata::for_file(&filename, raw_text.len() as u64);
        Self {
            id: Uuid::new_v4(),
            raw_text,
            metadata,
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub file_type: String,
}

impl DocumentMetadata {
    /// Derives the file type from the extension, upper-cased without the dot.
    pub fn for_file(filename: &str, size_bytes: u64) -> Self {
        let file_type = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_uppercase)
            .unwrap_or_default();

        Self {
            filename: filename.to_string(),
            size_bytes,
            file_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub parent_document_id: Uuid,
    pub text: String,
    pub char_start: usize,
    pub char_end: usize,
    pub source_filename: String,
    pub chunk_index: usize,
}

impl Chunk {
    pub fn len_chars(&self) -> usize {
        self.char_end - self.char_start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DomainError::invalid_argument("chunk_size must be positive"));
        }
        if overlap >= chunk_size {
            return Err(DomainError::invalid_argument(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Splits a document into fixed-size, overlapping character windows.
///
/// Windows are `chunk_size` chars long and advance by `chunk_size - overlap`.
/// The last window is clipped to the end of the text, and splitting stops as
/// soon as a window reaches the end, so every chunk but the last is full-size.
/// Offsets count Unicode scalar values, never bytes.
pub fn split_document(document: &Document, config: &ChunkerConfig) -> Result<Vec<Chunk>> {
    let text = document.raw_text.as_str();
    if text.trim().is_empty() {
        return Err(DomainError::empty_document(document.filename()));
    }

    // Byte offset of every char, plus the end of the text.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = offsets.len() - 1;

    let mut chunks = Vec::with_capacity(char_len / config.step() + 1);
    let mut start = 0;

    loop {
        let end = (start + config.chunk_size).min(char_len);
        chunks.push(Chunk {
            parent_document_id: document.id,
            text: text[offsets[start]..offsets[end]].to_string(),
            char_start: start,
            char_end: end,
            source_filename: document.metadata.filename.clone(),
            chunk_index: chunks.len(),
        });

        if end == char_len {
            break;
        }
        start += config.step();
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                out.extend(chunk.text.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_split_short_document_single_chunk() {
        let doc = Document::new("a.txt", "Hello world.");
        let chunks = split_document(&doc, &ChunkerConfig::default()).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world.");
        assert_eq!(chunks[0].char_start, 0);
        assert_eq!(chunks[0].char_end, 12);
        assert_eq!(chunks[0].source_filename, "a.txt");
        assert_eq!(chunks[0].parent_document_id, doc.id);
    }

    #[test]
    fn test_split_2100_chars_yields_three_chunks() {
        let text: String = (0..2100).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let doc = Document::new("long.txt", text.clone());
        let chunks = split_document(&doc, &ChunkerConfig::default()).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!((chunks[0].char_start, chunks[0].char_end), (0, 1024));
        assert_eq!((chunks[1].char_start, chunks[1].char_end), (1004, 2028));
        assert_eq!((chunks[2].char_start, chunks[2].char_end), (2008, 2100));
        assert_eq!(chunks[1].char_start, chunks[0].char_end - 20);
        assert_eq!(reassemble(&chunks, 20), text);
    }

    #[test]
    fn test_non_final_chunks_are_full_and_overlap_exactly() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let doc = Document::new("fox.txt", text.clone());
        let config = ChunkerConfig::new(64, 8).unwrap();
        let chunks = split_document(&doc, &config).unwrap();

        for pair in chunks.windows(2) {
            assert_eq!(pair[0].text.chars().count(), 64);
            let tail: String = pair[0].text.chars().skip(64 - 8).collect();
            let head: String = pair[1].text.chars().take(8).collect();
            assert_eq!(tail, head);
        }
        assert!(chunks.last().unwrap().len_chars() <= 64);
        assert_eq!(reassemble(&chunks, 8), text);
    }

    #[test]
    fn test_split_counts_chars_not_bytes() {
        let text = "héllo wörld ".repeat(10);
        let doc = Document::new("utf8.txt", text.clone());
        let config = ChunkerConfig::new(16, 4).unwrap();
        let chunks = split_document(&doc, &config).unwrap();

        assert!(chunks.iter().all(|c| c.text.chars().count() <= 16));
        assert_eq!(chunks[0].text.chars().count(), 16);
        assert_eq!(reassemble(&chunks, 4), text);
    }

    #[test]
    fn test_split_is_deterministic() {
        let doc = Document::new("d.txt", "lorem ipsum dolor sit amet ".repeat(100));
        let config = ChunkerConfig::new(100, 10).unwrap();
        let first = split_document(&doc, &config).unwrap();
        let second = split_document(&doc, &config).unwrap();

        let bounds = |c: &[Chunk]| c.iter().map(|c| (c.char_start, c.char_end)).collect::<Vec<_>>();
        assert_eq!(bounds(&first), bounds(&second));
    }

    #[test]
    fn test_split_exact_chunk_size_has_no_trailing_chunk() {
        let doc = Document::new("exact.txt", "x".repeat(1024));
        let chunks = split_document(&doc, &ChunkerConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_split_empty_document_fails() {
        let doc = Document::new("empty.txt", "   \n\t");
        let err = split_document(&doc, &ChunkerConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::EmptyDocument(name) if name == "empty.txt"));
    }

    #[test]
    fn test_chunker_config_rejects_bad_overlap() {
        assert!(ChunkerConfig::new(0, 0).is_err());
        assert!(ChunkerConfig::new(10, 10).is_err());
        assert!(ChunkerConfig::new(10, 9).is_ok());
    }

    #[test]
    fn test_metadata_type_from_extension() {
        let meta = DocumentMetadata::for_file("notes.md", 42);
        assert_eq!(meta.file_type, "MD");
        assert_eq!(meta.size_bytes, 42);
        assert_eq!(DocumentMetadata::for_file("README", 1).file_type, "");
    }
}
