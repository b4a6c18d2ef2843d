//! In-memory vector index over transcript chunks.
//!
//! Built once at startup, immutable afterwards; safe to share across readers.

use crate::chunking::Chunk;
use crate::error::{Result, SvarError};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// A chunk paired with its embedding.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// The indexed chunk.
    pub chunk: Chunk,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

/// A query match with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Cosine similarity (higher is better).
    pub score: f32,
}

/// An immutable in-memory similarity index.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    built_at: DateTime<Utc>,
}

impl VectorIndex {
    /// Build an index from chunks and their embeddings.
    ///
    /// The pairing is one-to-one; a count mismatch means embedding generation
    /// dropped or duplicated vectors and the index refuses to be built.
    pub fn build(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(SvarError::Embedding(format!(
                "expected {} embeddings for {} chunks, got {}",
                chunks.len(),
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry {
                id: Uuid::new_v4(),
                chunk,
                embedding,
            })
            .collect();

        debug!("Built vector index with {} entries", entries.len());

        Ok(Self {
            entries,
            built_at: Utc::now(),
        })
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the index was built.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Return the top-`k` chunks most similar to the query embedding.
    ///
    /// Results are sorted by decreasing similarity; ties keep insertion
    /// order (the sort is stable). If `k` exceeds the index size, every
    /// entry is returned.
    pub fn query(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        results
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(order: i32, text: &str) -> Chunk {
        Chunk::new(order, text.to_string(), 0, 0)
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_build_rejects_mismatch() {
        let err = VectorIndex::build(vec![chunk(0, "a"), chunk(1, "b")], vec![vec![1.0]])
            .unwrap_err();
        assert!(matches!(err, SvarError::Embedding(_)));
    }

    #[test]
    fn test_query_sorted_and_bounded() {
        let index = VectorIndex::build(
            vec![chunk(0, "east"), chunk(1, "north"), chunk(2, "northeast")],
            vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.7, 0.7],
            ],
        )
        .unwrap();

        let results = index.query(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "east");
        assert_eq!(results[1].chunk.text, "northeast");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_query_k_exceeds_size() {
        let index = VectorIndex::build(
            vec![chunk(0, "a"), chunk(1, "b")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        // The demo default of k=4 against a 2-chunk index returns both.
        let results = index.query(&[1.0, 0.0], 4);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = VectorIndex::build(
            vec![chunk(0, "first"), chunk(1, "second"), chunk(2, "third")],
            vec![
                vec![1.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 0.0],
            ],
        )
        .unwrap();

        let results = index.query(&[1.0, 0.0], 3);
        assert_eq!(results[0].chunk.text, "first");
        assert_eq!(results[1].chunk.text, "second");
        assert_eq!(results[2].chunk.text, "third");
    }

    #[test]
    fn test_query_idempotent() {
        let index = VectorIndex::build(
            vec![chunk(0, "a"), chunk(1, "b"), chunk(2, "c")],
            vec![
                vec![0.9, 0.1],
                vec![0.1, 0.9],
                vec![0.5, 0.5],
            ],
        )
        .unwrap();

        let first = index.query(&[1.0, 0.0], 2);
        let second = index.query(&[1.0, 0.0], 2);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.chunk.text, b.chunk.text);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_empty_index() {
        let index = VectorIndex::build(Vec::new(), Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.query(&[1.0, 0.0], 4).is_empty());
    }
}
