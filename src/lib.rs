//! Svar - Podcast Transcript Question Answering
//!
//! A small retrieval-augmented answering tool over a single podcast transcript.
//!
//! The name "Svar" comes from the Norwegian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Load a transcript file and index it into an in-memory vector index
//! - Ask questions and get AI-generated answers grounded in the transcript
//! - Search the transcript semantically without generating an answer
//! - Serve a minimal web form for interactive questions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration, credentials, and prompt templates
//! - `document` - Transcript loading
//! - `chunking` - Splitting the transcript into overlapping chunks
//! - `embedding` - Embedding generation
//! - `vector_index` - In-memory similarity index
//! - `qa` - Retrieval and answer generation
//! - `session` - Per-question orchestration
//!
//! # Example
//!
//! ```rust,no_run
//! use svar::config::{Credentials, Settings};
//! use svar::session::{SessionDriver, SessionOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::from_env()?;
//!     let settings = Settings::load()?;
//!     let mut driver = SessionDriver::build(&settings, credentials).await?;
//!
//!     if let SessionOutcome::Answered { answer, .. } =
//!         driver.handle("Who invented playing cards?").await?
//!     {
//!         println!("{}", answer.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod qa;
pub mod session;
pub mod vector_index;

pub use error::{Result, SvarError};
