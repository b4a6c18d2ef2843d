//! Ask command implementation.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::session::{SessionDriver, SessionOutcome};
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    top_k: usize,
    mut settings: Settings,
) -> Result<()> {
    // Resolve credentials before touching the transcript.
    let credentials = match Credentials::from_env() {
        Ok(creds) => creds,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if let Some(model) = model {
        settings.answer.model = model;
    }
    settings.answer.top_k = top_k;

    let spinner = Output::spinner("Indexing transcript...");
    let mut driver = match SessionDriver::build(&settings, credentials).await {
        Ok(driver) => driver,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to build index: {}", e));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();
    Output::success(&format!("Indexed {} chunks", driver.index().len()));

    let spinner = Output::spinner("Answering...");
    match driver.handle(question).await {
        Ok(SessionOutcome::Answered { answer, sources }) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer.text);

            Output::header("Usage");
            Output::kv("Prompt tokens", &answer.usage.prompt_tokens.to_string());
            Output::kv("Completion tokens", &answer.usage.completion_tokens.to_string());
            Output::kv(
                "Estimated cost",
                &format!("${:.6}", answer.usage.estimated_cost_usd),
            );

            if !sources.is_empty() {
                Output::header("Sources");
                for source in &sources {
                    Output::source(&source.chunk.char_range(), source.score, &source.chunk.text);
                }
            }
        }
        Ok(SessionOutcome::NoQuestion) => {
            spinner.finish_and_clear();
            Output::info("No question given; nothing to answer.");
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
