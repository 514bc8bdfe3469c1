//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Implementations live in querysmith-llm and querysmith-store.

use crate::{CompletionConfig, RequestContext, SampleQuery, Schema};
use async_trait::async_trait;

/// Prompt in, text out
///
/// Implemented by the infrastructure layer (querysmith-llm). Implementations make a
/// single attempt; timeouts and retries are applied by the caller.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Error type for completion calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one completion
    async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        config: &CompletionConfig,
    ) -> Result<String, Self::Error>;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for std::sync::Arc<T> {
    type Error = T::Error;

    async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        config: &CompletionConfig,
    ) -> Result<String, Self::Error> {
        (**self).complete(prompt, system_prompt, config).await
    }
}

/// Persistent settings
///
/// Implemented by the infrastructure layer (querysmith-store). Absent keys yield
/// defaults: default config, placeholder schema, empty corpus, debug off.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the completion config
    async fn get_config(&self) -> Result<CompletionConfig, Self::Error>;

    /// Write the completion config
    async fn set_config(&self, config: &CompletionConfig) -> Result<(), Self::Error>;

    /// Read the index schema
    async fn get_schema(&self) -> Result<Schema, Self::Error>;

    /// Write the index schema
    async fn set_schema(&self, schema: &Schema) -> Result<(), Self::Error>;

    /// Read the example corpus
    async fn get_example_corpus(&self) -> Result<Vec<SampleQuery>, Self::Error>;

    /// Write the example corpus
    async fn set_example_corpus(&self, corpus: &[SampleQuery]) -> Result<(), Self::Error>;

    /// Read the debug flag
    async fn get_debug_flag(&self) -> Result<bool, Self::Error>;

    /// Write the debug flag
    async fn set_debug_flag(&self, debug: bool) -> Result<(), Self::Error>;

    /// Read every setting a request needs
    ///
    /// The default reads each key on its own, so a concurrent write can land
    /// between them. Stores that can read all keys at once override this.
    async fn load_context(&self) -> Result<RequestContext, Self::Error> {
        Ok(RequestContext::new(
            self.get_config().await?,
            self.get_schema().await?,
            self.get_example_corpus().await?,
            self.get_debug_flag().await?,
        ))
    }
}
