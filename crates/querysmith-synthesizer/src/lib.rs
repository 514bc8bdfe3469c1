//! Querysmith Synthesizer
//!
//! Drafts one candidate search query per perspective, then makes it safe and
//! cheap with deterministic rewrites.
//!
//! # Architecture
//!
//! ```text
//! Intent + Perspective → LLM → JSON recovery → mandatory filters → optimization → EsQuery
//! ```
//!
//! The two deterministic stages are exposed on their own so callers can apply
//! them to queries from other sources:
//!
//! ```
//! use querysmith_domain::{EsQuery, Intent};
//! use querysmith_synthesizer::{enforce_mandatory_filters, optimize_query, SynthesizerConfig};
//! use serde_json::json;
//!
//! let draft = EsQuery::with_query(json!({"match": {"job_title": "engineer"}}));
//! let query = optimize_query(
//!     enforce_mandatory_filters(draft),
//!     &Intent::new("engineer jobs"),
//!     &SynthesizerConfig::default(),
//! );
//!
//! assert_eq!(query.size, Some(50));
//! let filters = &query.query.unwrap()["bool"]["filter"];
//! assert_eq!(filters.as_array().unwrap().len(), 2);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod examples;
mod filters;
mod optimize;
mod parser;
mod prompt;
mod synthesizer;


pub use config::SynthesizerConfig;
pub use error::SynthesisError;
pub use examples::{score_example, select_similar};
pub use filters::{enforce_mandatory_filters, mandatory_filters};
pub use optimize::optimize_query;
pub use parser::{extract_query_object, first_balanced_object};
pub use prompt::QueryPromptBuilder;
pub use synthesizer::{QuerySynthesizer, AGENT_NAME};
