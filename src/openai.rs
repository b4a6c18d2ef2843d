//! OpenAI client construction with explicit credentials and a request timeout.

use crate::config::Credentials;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client from explicit credentials.
///
/// The API key is passed in rather than read from the process environment,
/// so a missing key is caught once at startup instead of at call time.
pub fn create_client(credentials: &Credentials) -> Client<OpenAIConfig> {
    create_client_with_timeout(credentials, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom request timeout.
pub fn create_client_with_timeout(
    credentials: &Credentials,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::new().with_api_key(credentials.api_key()))
        .with_http_client(http_client)
}
