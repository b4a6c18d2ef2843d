//! Prompt templates for Svar.
//!
//! Prompts can be customized by placing TOML files in a custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub qa: QaPrompts,
}

/// Prompts for question answering over retrieved transcript chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful assistant that answers questions about a podcast episode using excerpts from its transcript.

Guidelines:
- Answer using only the provided transcript excerpts
- If the excerpts don't contain the answer, say so clearly rather than guessing
- Be concise; a few sentences is usually enough
- You may quote short phrases from the excerpts when it helps"#
                .to_string(),

            user: r#"Question: {{question}}

Relevant excerpts from the podcast transcript:

{{context}}

Please answer the question based on the excerpts above."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from defaults, with optional custom directory overrides.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.qa.system.is_empty());
        assert!(prompts.qa.user.contains("{{question}}"));
        assert!(prompts.qa.user.contains("{{context}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Q: {{question}}\nC: {{context}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "Why?".to_string());
        vars.insert("context".to_string(), "Because.".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Q: Why?\nC: Because.");
    }
}
