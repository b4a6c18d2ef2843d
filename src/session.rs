//! Per-question orchestration.
//!
//! Builds the pipeline once (load, chunk, embed, index) and then drives each
//! question through retrieval and generation.

use crate::chunking;
use crate::config::{Credentials, Prompts, Settings};
use crate::document::Document;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::qa::{Answer, AnswerEngine, Retriever};
use crate::vector_index::{ScoredChunk, VectorIndex};
use std::sync::Arc;
use tracing::{info, instrument};

/// State of the question-answering session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a non-empty question.
    AwaitingQuestion,
    /// Embedding the question and querying the index.
    Retrieving,
    /// Generating the answer from retrieved context.
    Answering,
    /// Answer produced, being rendered.
    Displaying,
}

/// Outcome of handling one user interaction.
#[derive(Debug)]
pub enum SessionOutcome {
    /// A question was answered.
    Answered {
        answer: Answer,
        sources: Vec<ScoredChunk>,
    },
    /// The question was empty; nothing was retrieved or generated.
    NoQuestion,
}

/// Drives one question at a time against a prebuilt index.
///
/// The index is built once at construction and never rebuilt per question.
/// A failed request resets the session to `AwaitingQuestion` and leaves the
/// index intact for the next question.
#[derive(Debug)]
pub struct SessionDriver {
    retriever: Retriever,
    engine: AnswerEngine,
    state: SessionState,
}

impl SessionDriver {
    /// Resolve credentials from the environment, then build the pipeline.
    ///
    /// The key is checked before the transcript file is touched, so a
    /// missing API key fails before any file access.
    pub async fn bootstrap(settings: &Settings) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        Self::build(settings, credentials).await
    }

    /// Build the full pipeline from already-resolved credentials: load the
    /// transcript, chunk it, embed the chunks, and construct the index.
    pub async fn build(settings: &Settings, credentials: Credentials) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let retriever = build_retriever(settings, &credentials).await?;
        let engine = AnswerEngine::new(&credentials, &settings.answer, prompts)?;

        Ok(Self::with_components(retriever, engine))
    }

    /// Create a driver from prebuilt components.
    pub fn with_components(retriever: Retriever, engine: AnswerEngine) -> Self {
        Self {
            retriever,
            engine,
            state: SessionState::AwaitingQuestion,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The prebuilt index.
    pub fn index(&self) -> &VectorIndex {
        self.retriever.index()
    }

    /// Handle one user interaction.
    ///
    /// An empty or blank question performs no retrieval and no generation
    /// and is not an error; the session simply keeps waiting. Otherwise the
    /// session advances `Retrieving` -> `Answering` -> `Displaying` and
    /// returns to `AwaitingQuestion` when the answer has been produced.
    #[instrument(skip(self, question))]
    pub async fn handle(&mut self, question: &str) -> Result<SessionOutcome> {
        let question = question.trim();
        if question.is_empty() {
            self.state = SessionState::AwaitingQuestion;
            return Ok(SessionOutcome::NoQuestion);
        }

        self.state = SessionState::Retrieving;
        let sources = match self.retriever.retrieve(question).await {
            Ok(sources) => sources,
            Err(e) => {
                self.state = SessionState::AwaitingQuestion;
                return Err(e);
            }
        };

        self.state = SessionState::Answering;
        let answer = match self.engine.answer(question, &sources).await {
            Ok(answer) => answer,
            Err(e) => {
                self.state = SessionState::AwaitingQuestion;
                return Err(e);
            }
        };

        self.state = SessionState::Displaying;
        let outcome = SessionOutcome::Answered { answer, sources };

        // Ready for the next question.
        self.state = SessionState::AwaitingQuestion;
        Ok(outcome)
    }
}

/// Index the configured transcript and pair it with an embedder.
///
/// Shared by the answering session and the retrieval-only search command.
pub async fn build_retriever(settings: &Settings, credentials: &Credentials) -> Result<Retriever> {
    settings.chunking.validate()?;

    let document = Document::load(&settings.document_path())?;
    let chunks = chunking::split(&document.text, &settings.chunking)?;
    info!(
        "Split '{}' into {} chunks (size {}, overlap {})",
        document.source,
        chunks.len(),
        settings.chunking.size,
        settings.chunking.overlap
    );

    let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::new(
        credentials,
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let index = Arc::new(VectorIndex::build(chunks, embeddings)?);
    info!("Indexed {} chunks", index.len());

    Ok(Retriever::new(index, embedder, settings.answer.top_k))
}
