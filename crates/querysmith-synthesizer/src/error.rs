//! Error types for the query synthesizer

use querysmith_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while building a query for one perspective
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Completion service failed after its retry budget
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Response holds no JSON object
    #[error("Invalid JSON in LLM response")]
    NoQueryObject,

    /// JSON object found but it is not a usable query document
    #[error("Invalid query document: {0}")]
    InvalidQuery(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SynthesisError {
    fn from(e: serde_json::Error) -> Self {
        SynthesisError::JsonParse(e.to_string())
    }
}
