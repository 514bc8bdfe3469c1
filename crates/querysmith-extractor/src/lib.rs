//! Querysmith Extractor
//!
//! Converts a free-text request into a structured, normalized intent.
//!
//! # Architecture
//!
//! ```text
//! Text → IntentExtractor → LLM → JSON → coercion → normalization → Intent
//! ```
//!
//! The model output is never trusted as-is: every field is coerced into the
//! intent invariants, and company and skill names are mapped to canonical
//! forms.
//!
//! # Example Usage
//!
//! ```no_run
//! use querysmith_domain::{RequestContext, SessionLog};
//! use querysmith_extractor::IntentExtractor;
//! use querysmith_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"entities": {"skills": ["js"]}, "confidence": 0.8}"#);
//! let extractor = IntentExtractor::new(llm);
//!
//! let mut log = SessionLog::new();
//! let intent = extractor
//!     .extract("JavaScript jobs", &RequestContext::default(), &mut log)
//!     .await?;
//!
//! assert_eq!(intent.entities.skills, vec!["JavaScript"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod normalize;
mod parser;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::{IntentExtractor, AGENT_NAME};
pub use normalize::{normalize_company, normalize_skill};
pub use parser::{coerce_intent, extract_json_object, parse_intent_response};
pub use prompt::{select_examples, IntentPromptBuilder};
