//! Querysmith Pipeline
//!
//! Turns one free-text request into ranked candidate search queries.
//!
//! # Architecture
//!
//! ```text
//! text → IntentExtractor → generate_perspectives → ┬ branch: synthesize → validate ┐
//!                                                  ├ branch: synthesize → validate ┤ → select_best
//!                                                  └ branch: synthesize → validate ┘
//! ```
//!
//! Extraction failure fails the request. A failing branch is logged and
//! dropped while its siblings carry on.
//!
//! # Example Usage
//!
//! ```no_run
//! use querysmith_domain::RequestContext;
//! use querysmith_llm::MockProvider;
//! use querysmith_pipeline::Pipeline;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"query": {"match_all": {}}}"#);
//! llm.add_response("Extract structured intent", r#"{"analysisType": "search"}"#);
//!
//! let pipeline = Pipeline::new(llm);
//! let response = pipeline
//!     .process_request("recent jobs", Arc::new(RequestContext::default()))
//!     .await?;
//!
//! if let Some(best) = response.best {
//!     println!("{}", serde_json::to_string_pretty(&best.query)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod consensus;
mod coordinator;
mod error;
mod perspectives;

pub use config::PipelineConfig;
pub use consensus::{compare_candidates, select_best};
pub use coordinator::{Pipeline, PipelineResponse, Stage};
pub use error::{PipelineError, Result};
pub use perspectives::{generate_perspectives, MAX_PERSPECTIVES};
