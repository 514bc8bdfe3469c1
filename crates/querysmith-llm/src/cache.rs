//! Response cache for completion services
//!
//! Wraps any [`CompletionService`] and remembers successful completions for a
//! fixed time-to-live. Entries are keyed by provider, model, system prompt and
//! prompt. Expired entries are evicted when they are read, and every insert
//! sweeps out whatever else has expired.

use async_trait::async_trait;
use querysmith_domain::{CompletionConfig, CompletionService, ProviderKind};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live (1 hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    provider: ProviderKind,
    model: String,
    system_prompt: Option<String>,
    prompt: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    stored_at: Instant,
}

/// Completion service with a TTL response cache in front of it
#[derive(Debug)]
pub struct CachedCompletion<C> {
    inner: C,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl<C> CachedCompletion<C> {
    /// Wrap a service using the default TTL
    pub fn new(inner: C) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    /// Wrap a service with a custom TTL
    pub fn with_ttl(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped service
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("Completion cache hit ({})", key.model);
                Some(entry.text.clone())
            }
            Some(_) => {
                debug!("Completion cache entry expired ({})", key.model);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: CacheKey, text: String) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        let swept = before - entries.len();
        if swept > 0 {
            debug!("Swept {} expired completion(s)", swept);
        }
        entries.insert(
            key,
            CacheEntry {
                text,
                stored_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl<C: CompletionService> CompletionService for CachedCompletion<C> {
    type Error = C::Error;

    async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        config: &CompletionConfig,
    ) -> Result<String, Self::Error> {
        let key = CacheKey {
            provider: config.provider,
            model: config.model.clone(),
            system_prompt: system_prompt.map(str::to_string),
            prompt: prompt.to_string(),
        };

        if let Some(text) = self.lookup(&key) {
            return Ok(text);
        }

        let text = self.inner.complete(prompt, system_prompt, config).await?;
        self.store(key, text.clone());
        Ok(text)
    }
}
