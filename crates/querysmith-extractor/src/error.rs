//! Error types for the intent extractor

use querysmith_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during intent extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion service failed after its retry budget
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Request text is empty
    #[error("Empty request")]
    EmptyInput,

    /// Request text exceeds maximum length
    #[error("Request too long: {0} chars (max: {1})")]
    InputTooLong(usize, usize),

    /// Model output is not a JSON object
    #[error("Invalid intent format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
