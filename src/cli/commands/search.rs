//! Search command implementation.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::session::build_retriever;
use anyhow::Result;

/// Run the search command: retrieval only, no answer generation.
pub async fn run_search(query: &str, limit: usize, mut settings: Settings) -> Result<()> {
    let credentials = match Credentials::from_env() {
        Ok(creds) => creds,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    settings.answer.top_k = limit;

    let spinner = Output::spinner("Indexing transcript...");
    let retriever = match build_retriever(&settings, &credentials).await {
        Ok(retriever) => retriever,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to build index: {}", e));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    let spinner = Output::spinner("Searching...");
    match retriever.retrieve(query).await {
        Ok(results) => {
            spinner.finish_and_clear();

            if results.is_empty() {
                Output::info("No matching chunks found.");
                return Ok(());
            }

            Output::success(&format!("Found {} matching chunks:", results.len()));
            for result in &results {
                Output::source(&result.chunk.char_range(), result.score, &result.chunk.text);
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
