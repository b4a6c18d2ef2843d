//! API credentials, resolved once at process start.

use crate::error::{Result, SvarError};

/// Environment variable holding the OpenAI API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// OpenAI API credentials.
///
/// Loaded once at startup and passed explicitly to the embedding and answer
/// clients; no code path reads the environment after this point.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Create credentials from an explicit key value.
    ///
    /// For callers that obtain the key somewhere other than the environment;
    /// no emptiness check is applied here.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Load credentials from the process environment.
    ///
    /// Fails with [`SvarError::MissingCredential`] if the key is unset or
    /// empty, before any file is read or any request is made.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(std::env::var(API_KEY_VAR).ok())
    }

    fn from_lookup(value: Option<String>) -> Result<Self> {
        match value {
            Some(key) if !key.trim().is_empty() => Ok(Self { api_key: key }),
            Some(_) => Err(SvarError::MissingCredential(format!(
                "{} is empty. Set it with: export {}='sk-...'",
                API_KEY_VAR, API_KEY_VAR
            ))),
            None => Err(SvarError::MissingCredential(format!(
                "{} not set. Set it with: export {}='sk-...'",
                API_KEY_VAR, API_KEY_VAR
            ))),
        }
    }

    /// The raw API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key itself.
        f.debug_struct("Credentials").field("api_key", &"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails() {
        let err = Credentials::from_lookup(None).unwrap_err();
        assert!(matches!(err, SvarError::MissingCredential(_)));
    }

    #[test]
    fn test_empty_key_fails() {
        let err = Credentials::from_lookup(Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, SvarError::MissingCredential(_)));
    }

    #[test]
    fn test_valid_key() {
        let creds = Credentials::from_lookup(Some("sk-test".to_string())).unwrap();
        assert_eq!(creds.api_key(), "sk-test");
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials::from_lookup(Some("sk-secret".to_string())).unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-secret"));
    }
}
