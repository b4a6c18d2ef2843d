//! Question answering over retrieved transcript chunks.

mod engine;
mod retriever;

pub use engine::{Answer, AnswerEngine, Usage};
pub use retriever::Retriever;

use crate::vector_index::ScoredChunk;
use serde::{Deserialize, Serialize};

/// QA strategy for combining retrieved chunks into a prompt.
///
/// Only `Stuff` (concatenate everything into one prompt) is implemented;
/// the others are recognized but rejected at answer time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaStrategy {
    /// Concatenate all retrieved chunks into a single prompt.
    Stuff,
    /// Summarize chunks independently, then combine.
    MapReduce,
    /// Iteratively refine an answer across chunks.
    Refine,
}

impl std::str::FromStr for QaStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stuff" => Ok(QaStrategy::Stuff),
            "map-reduce" | "map_reduce" => Ok(QaStrategy::MapReduce),
            "refine" => Ok(QaStrategy::Refine),
            _ => Err(format!("Unknown QA strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for QaStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QaStrategy::Stuff => write!(f, "stuff"),
            QaStrategy::MapReduce => write!(f, "map-reduce"),
            QaStrategy::Refine => write!(f, "refine"),
        }
    }
}

/// Format retrieved chunks for inclusion in a prompt.
pub fn format_context_for_prompt(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            format!(
                "---\n[{}] {}\n{}\n---",
                i + 1,
                scored.chunk.char_range(),
                scored.chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
