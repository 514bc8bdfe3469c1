//! Per-request context snapshot

use crate::{CompletionConfig, SampleQuery, Schema};
use serde::{Deserialize, Serialize};

/// Everything a request reads from settings, captured once at request start
///
/// Shared across concurrent branches behind an `Arc`; never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Completion settings
    pub config: CompletionConfig,

    /// Target index schema
    pub schema: Schema,

    /// Example corpus
    pub corpus: Vec<SampleQuery>,

    /// Whether agent logs are surfaced in the response
    pub debug: bool,
}

impl RequestContext {
    /// Build a context from its parts
    pub fn new(
        config: CompletionConfig,
        schema: Schema,
        corpus: Vec<SampleQuery>,
        debug: bool,
    ) -> Self {
        Self {
            config,
            schema,
            corpus,
            debug,
        }
    }

    /// Same context with the debug flag overridden
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
