//! Querysmith LLM Provider Layer
//!
//! Implementations of the `CompletionService` trait from `querysmith-domain`.
//!
//! # Components
//!
//! - `HttpCompletionService`: talks to Gemini, OpenAI, Anthropic or Ollama,
//!   chosen per call by `CompletionConfig::provider`
//! - `MockProvider`: deterministic, substring-routed mock for testing
//! - `CachedCompletion`: TTL response cache around any service
//! - `complete_with_retry`: per-attempt timeout plus retry budget
//!
//! # Examples
//!
//! ```
//! use querysmith_domain::CompletionConfig;
//! use querysmith_llm::{complete_with_retry, MockProvider};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let text = complete_with_retry(&provider, "test prompt", None, &CompletionConfig::default())
//!     .await
//!     .unwrap();
//! assert_eq!(text, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod mock;
pub mod providers;
pub mod retry;

pub use cache::CachedCompletion;
pub use error::{LlmError, Result};
pub use mock::MockProvider;
pub use providers::{
    descriptor, descriptors, extract_content, shape_request, AuthType, HttpCompletionService,
    ProviderDescriptor, RateLimits, ShapedRequest,
};
pub use retry::complete_with_retry;
