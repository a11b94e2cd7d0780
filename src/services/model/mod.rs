/// Generative model abstraction
///
/// The recommender only needs one capability from a language model: given a
/// prompt and a JSON schema, return text that should be JSON matching that
/// schema. Providers implement this trait so the recommender can be exercised
/// against a fake in tests.
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::services::credentials::ApiKey;

pub mod gemini;

pub use gemini::GeminiModel;

/// Failures talking to a model provider
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request could not be sent or its body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("provider returned status {0}: {1}")]
    Status(StatusCode, String),

    /// The provider refused to answer the prompt
    #[error("prompt was blocked: {0}")]
    Blocked(String),

    /// The provider answered but not in the expected envelope
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Structured generation against a language model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends `prompt` constrained by `schema` and returns the raw response text
    async fn generate_json(
        &self,
        api_key: &ApiKey,
        prompt: &str,
        schema: &Value,
    ) -> ModelResult<String>;
}
