use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::domain::errors::{DomainError, Result};
use crate::domain::{Chunk, Embedding, RetrievalResult};

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Embedding,
}

/// Immutable, versioned set of embedded chunks.
///
/// Entries keep the order they were built in; that order breaks score ties.
#[derive(Debug)]
pub struct IndexSnapshot {
    version: u64,
    dimension: usize,
    entries: Vec<IndexEntry>,
    document_count: usize,
    built_at: DateTime<Utc>,
}

impl IndexSnapshot {
    pub fn new(version: u64, entries: Vec<IndexEntry>) -> Result<Self> {
        let first = entries.first().ok_or(DomainError::EmptyCorpus)?;
        let dimension = first.embedding.dimension();
        if dimension == 0 {
            return Err(DomainError::model_unavailable(
                "embedder returned a zero-dimensional vector",
            ));
        }
        if let Some(bad) = entries
            .iter()
            .find(|e| e.embedding.dimension() != dimension)
        {
            return Err(DomainError::model_unavailable(format!(
                "embedder returned inconsistent dimensions for {}: expected {dimension}, got {}",
                bad.chunk.source_filename,
                bad.embedding.dimension()
            )));
        }
        if let Some(bad) = entries.iter().find(|e| !e.embedding.is_finite()) {
            return Err(DomainError::model_unavailable(format!(
                "embedder returned a non-finite vector for {}",
                bad.chunk.source_filename
            )));
        }

        let document_count = entries
            .iter()
            .map(|e| e.chunk.parent_document_id)
            .collect::<HashSet<_>>()
            .len();

        Ok(Self {
            version,
            dimension,
            entries,
            document_count,
            built_at: Utc::now(),
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Ranks every entry by cosine similarity to `query`.
    ///
    /// Results are sorted by non-increasing score; the sort is stable, so equal
    /// scores keep insertion order.
    pub fn search(
        &self,
        query: &Embedding,
        top_k: usize,
        excerpt_chars: usize,
    ) -> Result<Vec<RetrievalResult>> {
        if query.dimension() != self.dimension {
            return Err(DomainError::retrieval(format!(
                "query dimension {} does not match index dimension {}",
                query.dimension(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, query.cosine_similarity(&entry.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(i, score)| {
                let chunk = &self.entries[i].chunk;
                RetrievalResult::new(&chunk.source_filename, score, &chunk.text, excerpt_chars)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(doc: Uuid, name: &str, text: &str, vec: Vec<f32>) -> IndexEntry {
        IndexEntry {
            chunk: Chunk {
                parent_document_id: doc,
                text: text.to_string(),
                char_start: 0,
                char_end: text.chars().count(),
                source_filename: name.to_string(),
                chunk_index: 0,
            },
            embedding: Embedding::new(vec),
        }
    }

    fn sample() -> IndexSnapshot {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        IndexSnapshot::new(
            1,
            vec![
                entry(a, "a.txt", "first", vec![1.0, 0.0, 0.0]),
                entry(b, "b.txt", "second", vec![0.0, 1.0, 0.0]),
                entry(a, "a.txt", "third", vec![0.7, 0.7, 0.0]),
                entry(b, "b.txt", "fourth", vec![1.0, 0.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            IndexSnapshot::new(1, vec![]),
            Err(DomainError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_new_rejects_mixed_dimensions() {
        let doc = Uuid::new_v4();
        let result = IndexSnapshot::new(
            1,
            vec![
                entry(doc, "a.txt", "x", vec![1.0, 0.0]),
                entry(doc, "a.txt", "y", vec![1.0, 0.0, 0.0]),
            ],
        );
        assert!(matches!(result, Err(DomainError::ModelUnavailable(_))));
    }

    #[test]
    fn test_new_rejects_non_finite_vectors() {
        let doc = Uuid::new_v4();
        let result = IndexSnapshot::new(
            1,
            vec![
                entry(doc, "a.txt", "x", vec![1.0, 0.0]),
                entry(doc, "a.txt", "y", vec![f32::NAN, 1.0]),
            ],
        );
        assert!(matches!(result, Err(DomainError::ModelUnavailable(_))));
    }

    #[test]
    fn test_search_with_non_finite_query_stays_ranked() {
        let doc = Uuid::new_v4();
        let entries = (0..40)
            .map(|i| {
                let y = i as f32 / 10.0;
                entry(doc, "a.txt", &format!("chunk {i}"), vec![1.0, y])
            })
            .collect();
        let snapshot = IndexSnapshot::new(1, entries).unwrap();

        for query in [vec![1.0, 0.0], vec![f32::NAN, 1.0], vec![f32::MAX, f32::MAX]] {
            let results = snapshot.search(&Embedding::new(query), 40, 200).unwrap();
            assert_eq!(results.len(), 40);
            assert!(results
                .iter()
                .all(|r| (-1.0..=1.0).contains(&r.similarity_score)));
            assert!(results
                .windows(2)
                .all(|w| w[0].similarity_score >= w[1].similarity_score));
        }
    }

    #[test]
    fn test_search_ranks_and_truncates() {
        let snapshot = sample();
        assert_eq!(snapshot.document_count(), 2);

        let results = snapshot
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 3, 200)
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity_score >= w[1].similarity_score));
        assert_eq!(results[2].text, "third");
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let snapshot = sample();
        let results = snapshot
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 2, 200)
            .unwrap();

        assert_eq!(results[0].text, "first");
        assert_eq!(results[1].text, "fourth");
        assert_eq!(results[0].similarity_score, results[1].similarity_score);
    }

    #[test]
    fn test_search_top_k_larger_than_index() {
        let snapshot = sample();
        let results = snapshot
            .search(&Embedding::new(vec![0.0, 0.0, 1.0]), 50, 200)
            .unwrap();
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let err = sample()
            .search(&Embedding::new(vec![1.0, 0.0]), 1, 200)
            .unwrap_err();
        assert!(matches!(err, DomainError::Retrieval(_)));
    }
}
