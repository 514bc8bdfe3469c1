//! In-memory settings store

use crate::error::StoreError;
use async_trait::async_trait;
use querysmith_domain::{CompletionConfig, RequestContext, SampleQuery, Schema, SettingsStore};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Settings {
    config: Option<CompletionConfig>,
    schema: Option<Schema>,
    corpus: Option<Vec<SampleQuery>>,
    debug: bool,
}

/// Settings store that lives only as long as the process
///
/// Same defaults as the SQLite store. Useful for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn settings(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    type Error = StoreError;

    async fn get_config(&self) -> Result<CompletionConfig, Self::Error> {
        Ok(self.settings().config.clone().unwrap_or_default())
    }

    async fn set_config(&self, config: &CompletionConfig) -> Result<(), Self::Error> {
        self.settings().config = Some(config.clone());
        Ok(())
    }

    async fn get_schema(&self) -> Result<Schema, Self::Error> {
        Ok(self.settings().schema.clone().unwrap_or_default())
    }

    async fn set_schema(&self, schema: &Schema) -> Result<(), Self::Error> {
        self.settings().schema = Some(schema.clone());
        Ok(())
    }

    async fn get_example_corpus(&self) -> Result<Vec<SampleQuery>, Self::Error> {
        Ok(self.settings().corpus.clone().unwrap_or_default())
    }

    async fn set_example_corpus(&self, corpus: &[SampleQuery]) -> Result<(), Self::Error> {
        self.settings().corpus = Some(corpus.to_vec());
        Ok(())
    }

    async fn get_debug_flag(&self) -> Result<bool, Self::Error> {
        Ok(self.settings().debug)
    }

    async fn set_debug_flag(&self, debug: bool) -> Result<(), Self::Error> {
        self.settings().debug = debug;
        Ok(())
    }

    async fn load_context(&self) -> Result<RequestContext, Self::Error> {
        let settings = self.settings();
        Ok(RequestContext::new(
            settings.config.clone().unwrap_or_default(),
            settings.schema.clone().unwrap_or_default(),
            settings.corpus.clone().unwrap_or_default(),
            settings.debug,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get_config().await.unwrap(), CompletionConfig::default());
        assert_eq!(store.get_schema().await.unwrap().index_name, "default_index");
        assert!(store.get_example_corpus().await.unwrap().is_empty());
        assert!(!store.get_debug_flag().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemorySettingsStore::new();
        let config = CompletionConfig {
            model: "gpt-4o".to_string(),
            ..CompletionConfig::default()
        };
        store.set_config(&config).await.unwrap();
        store.set_debug_flag(true).await.unwrap();

        assert_eq!(store.get_config().await.unwrap().model, "gpt-4o");
        assert!(store.get_debug_flag().await.unwrap());
    }

    #[tokio::test]
    async fn test_load_context_matches_individual_reads() {
        let store = MemorySettingsStore::new();
        store.set_debug_flag(true).await.unwrap();

        let ctx = store.load_context().await.unwrap();
        assert!(ctx.debug);
        assert_eq!(ctx.config, store.get_config().await.unwrap());
        assert_eq!(ctx.schema, store.get_schema().await.unwrap());
        assert!(ctx.corpus.is_empty());
    }
}
