//! Querysmith Domain Layer
//!
//! This crate holds the data model shared by every stage of the query synthesis
//! pipeline, plus the two trait boundaries the pipeline talks through.
//!
//! ## Key Concepts
//!
//! - **Intent**: The normalized, structured reading of a free-text request
//! - **Perspective**: A named strategy for building one candidate query
//! - **EsQuery**: A candidate search query document
//! - **ValidationResult**: Score and diagnostics for one candidate
//! - **AgentLog**: Append-only audit entry recorded by every stage
//!
//! ## Architecture
//!
//! - Pure data and pure functions only
//! - `CompletionService` and `SettingsStore` are the infrastructure seams
//! - Implementations live in querysmith-llm and querysmith-store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agent_log;
pub mod config;
pub mod context;
pub mod intent;
pub mod perspective;
pub mod query;
pub mod result;
pub mod schema;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use agent_log::{AgentLog, PendingLog, SessionLog};
pub use config::{CompletionConfig, ProviderKind, UnsupportedProvider};
pub use context::RequestContext;
pub use intent::{clamp_unit, AnalysisType, Complexity, DateRange, Entities, Intent, SalaryRange};
pub use perspective::{Approach, Perspective, PerspectiveId};
pub use query::{EsQuery, SourceFilter, TrackTotalHits};
pub use result::{PerformanceMetrics, QueryResult};
pub use schema::{Mappings, SampleQuery, Schema};
pub use traits::{CompletionService, SettingsStore};
pub use validation::ValidationResult;
