//! Configuration module for Svar.
//!
//! Handles application settings, API credentials, and prompt templates.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{Credentials, API_KEY_VAR};
pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    AnswerSettings, ChunkingSettings, DocumentSettings, EmbeddingSettings, GeneralSettings,
    PromptSettings, Settings,
};
