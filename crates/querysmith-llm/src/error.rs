//! Error types for completion calls

use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider answered with a non-success status
    #[error("{provider} API error: {status} - {body}")]
    Provider {
        /// Provider id
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider needs an API key and none is configured
    #[error("No API key configured for provider {0}")]
    MissingApiKey(String),

    /// A single attempt ran past the configured timeout
    #[error("Completion timed out after {0} ms")]
    Timeout(u64),

    /// Error raised by a completion service implementation
    #[error("{0}")]
    Service(Box<dyn std::error::Error + Send + Sync>),

    /// Every attempt failed
    #[error("Completion failed after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error from the final attempt
        #[source]
        last: Box<LlmError>,
    },

    /// Scripted failure from the mock provider
    #[error("Mock error: {0}")]
    Mock(String),
}

impl LlmError {
    /// The error from the final attempt, unwrapping retry exhaustion
    pub fn last_attempt(&self) -> &LlmError {
        match self {
            LlmError::Exhausted { last, .. } => last.last_attempt(),
            other => other,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Communication(format!("Request failed: {}", err))
    }
}

/// Result type for completion calls
pub type Result<T> = std::result::Result<T, LlmError>;
