//! Retrieval of relevant chunks for a question.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_index::{ScoredChunk, VectorIndex};
use std::sync::Arc;

/// Pairs the vector index with the embedder it was built with, so a
/// question string can be queried directly.
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("index", &self.index)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a new retriever.
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Retrieve the chunks most similar to the question.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(question).await?;
        Ok(self.index.query(&query_embedding, self.top_k))
    }

    /// The underlying index.
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::SvarError;
    use async_trait::async_trait;

    /// Deterministic embedder: maps known words to fixed unit vectors.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
            Ok(match text {
                t if t.contains("card") => vec![1.0, 0.0],
                t if t.contains("history") => vec![0.0, 1.0],
                _ => vec![0.5, 0.5],
            })
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    /// Embedder that always fails, for propagation tests.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
            Err(SvarError::Embedding("service unavailable".to_string()))
        }

        async fn embed_batch(&self, _texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
            Err(SvarError::Embedding("service unavailable".to_string()))
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn test_index() -> Arc<VectorIndex> {
        Arc::new(
            VectorIndex::build(
                vec![
                    Chunk::new(0, "all about cards".to_string(), 0, 0),
                    Chunk::new(1, "some history notes".to_string(), 15, 0),
                ],
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_retrieve_ranks_by_similarity() {
        let retriever = Retriever::new(test_index(), Arc::new(StubEmbedder), 4);

        let results = retriever.retrieve("a question about cards").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "all about cards");
    }

    #[tokio::test]
    async fn test_retrieve_idempotent() {
        let retriever = Retriever::new(test_index(), Arc::new(StubEmbedder), 4);

        let first = retriever.retrieve("history question").await.unwrap();
        let second = retriever.retrieve("history question").await.unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.chunk.text, b.chunk.text);
            assert_eq!(a.score, b.score);
        }
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let retriever = Retriever::new(test_index(), Arc::new(FailingEmbedder), 4);

        let err = retriever.retrieve("anything").await.unwrap_err();
        assert!(matches!(err, SvarError::Embedding(_)));
    }
}
