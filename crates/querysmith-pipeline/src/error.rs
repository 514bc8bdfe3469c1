//! Error types for the pipeline

use querysmith_extractor::ExtractorError;
use thiserror::Error;

/// Errors that fail a whole request
///
/// Per-perspective failures never surface here; they are logged and the
/// branch is dropped.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Intent extraction failed
    #[error("Intent extraction failed: {0}")]
    Extraction(#[from] ExtractorError),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
