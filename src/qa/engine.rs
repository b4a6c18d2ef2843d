//! Answer generation from retrieved context.

use super::{format_context_for_prompt, QaStrategy};
use crate::config::{AnswerSettings, Credentials, Prompts};
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use crate::vector_index::ScoredChunk;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Token usage and estimated cost for one generation call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// A generated answer with usage metadata.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// Resource usage for this generation.
    pub usage: Usage,
}

/// Answer engine using the "stuff" strategy: all retrieved chunks are
/// concatenated into a single prompt alongside the question.
#[derive(Debug)]
pub struct AnswerEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    strategy: QaStrategy,
    temperature: f32,
    prompts: Prompts,
}

impl AnswerEngine {
    /// Create a new answer engine.
    pub fn new(credentials: &Credentials, settings: &AnswerSettings, prompts: Prompts) -> Result<Self> {
        let strategy: QaStrategy = settings
            .strategy
            .parse()
            .map_err(SvarError::Config)?;

        Ok(Self {
            client: create_client(credentials),
            model: settings.model.clone(),
            strategy,
            temperature: settings.temperature,
            prompts,
        })
    }

    /// The configured strategy.
    pub fn strategy(&self) -> QaStrategy {
        self.strategy
    }

    /// Generate an answer to the question from the retrieved context.
    #[instrument(skip(self, context), fields(question = %question, chunks = context.len()))]
    pub async fn answer(&self, question: &str, context: &[ScoredChunk]) -> Result<Answer> {
        match self.strategy {
            QaStrategy::Stuff => self.answer_stuff(question, context).await,
            other => Err(SvarError::NotImplemented(format!(
                "QA strategy '{}' is not implemented; use 'stuff'",
                other
            ))),
        }
    }

    async fn answer_stuff(&self, question: &str, context: &[ScoredChunk]) -> Result<Answer> {
        if context.is_empty() {
            return Ok(Answer {
                text: "I couldn't find any relevant part of the transcript for this question."
                    .to_string(),
                usage: Usage::default(),
            });
        }

        let context_text = format_context_for_prompt(context);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context_text);

        let user_prompt = Prompts::render(&self.prompts.qa.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.qa.system.clone())
                .build()
                .map_err(|e| SvarError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| SvarError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| SvarError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::Generation(format!("Chat API error: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Generation("Empty response from LLM".to_string()))?
            .clone();

        let usage = response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
                estimated_cost_usd: estimate_cost(
                    &self.model,
                    u.prompt_tokens,
                    u.completion_tokens,
                ),
            })
            .unwrap_or_default();

        info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            estimated_cost_usd = usage.estimated_cost_usd,
            "Token usage"
        );

        Ok(Answer { text, usage })
    }
}

/// Per-million-token prices (input, output) in USD for known models.
fn model_pricing(model: &str) -> Option<(f64, f64)> {
    match model {
        m if m.starts_with("gpt-4o-mini") => Some((0.15, 0.60)),
        m if m.starts_with("gpt-4o") => Some((2.50, 10.00)),
        m if m.starts_with("gpt-4.1-mini") => Some((0.40, 1.60)),
        m if m.starts_with("gpt-4.1") => Some((2.00, 8.00)),
        _ => None,
    }
}

/// Estimate the USD cost of one call. Unknown models cost 0.0.
pub fn estimate_cost(model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    match model_pricing(model) {
        Some((input, output)) => {
            (prompt_tokens as f64 * input + completion_tokens as f64 * output) / 1_000_000.0
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials::new("sk-test")
    }

    #[test]
    fn test_estimate_cost() {
        let cost = estimate_cost("gpt-4o-mini", 1_000_000, 1_000_000);
        assert!((cost - 0.75).abs() < 1e-9);

        assert_eq!(estimate_cost("some-unknown-model", 1000, 1000), 0.0);
    }

    #[test]
    fn test_engine_rejects_unknown_strategy() {
        let settings = AnswerSettings {
            strategy: "mystery".to_string(),
            ..Default::default()
        };
        let err = AnswerEngine::new(&test_credentials(), &settings, Prompts::default()).unwrap_err();
        assert!(matches!(err, SvarError::Config(_)));
    }

    #[tokio::test]
    async fn test_unimplemented_strategy_fails_at_answer() {
        let settings = AnswerSettings {
            strategy: "map-reduce".to_string(),
            ..Default::default()
        };
        let engine =
            AnswerEngine::new(&test_credentials(), &settings, Prompts::default()).unwrap();
        assert_eq!(engine.strategy(), QaStrategy::MapReduce);

        let err = engine.answer("why?", &[]).await.unwrap_err();
        assert!(matches!(err, SvarError::NotImplemented(_)));
    }

    #[tokio::test]
    async fn test_empty_context_short_circuits() {
        let engine = AnswerEngine::new(
            &test_credentials(),
            &AnswerSettings::default(),
            Prompts::default(),
        )
        .unwrap();

        // No API call is made when there is nothing to stuff into the prompt.
        let answer = engine.answer("anything", &[]).await.unwrap();
        assert!(answer.text.contains("couldn't find"));
        assert_eq!(answer.usage.total_tokens, 0);
    }
}
