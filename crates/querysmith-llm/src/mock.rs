//! Mock completion service for deterministic testing
//!
//! Responses are routed by substring: the first rule whose pattern occurs in
//! the prompt or system prompt decides the reply. Unmatched prompts get the
//! default response.

use crate::LlmError;
use async_trait::async_trait;
use querysmith_domain::{CompletionConfig, CompletionService};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error(String),
    Delayed(Duration, String),
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<(String, Reply)>,
    calls: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Clones share rules and the call log.
///
/// # Examples
///
/// ```
/// use querysmith_llm::MockProvider;
/// use querysmith_domain::{CompletionConfig, CompletionService};
///
/// # tokio_test_block(async {
/// let provider = MockProvider::new("fallback");
/// provider.add_response("Extract structured intent", "{}");
///
/// let config = CompletionConfig::default();
/// let text = provider.complete("Extract structured intent from: x", None, &config).await.unwrap();
/// assert_eq!(text, "{}");
/// assert_eq!(provider.call_count(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for unmatched prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Reply with `response` when `pattern` occurs in the prompt
    pub fn add_response(&self, pattern: impl Into<String>, response: impl Into<String>) {
        self.state()
            .rules
            .push((pattern.into(), Reply::Text(response.into())));
    }

    /// Fail with `message` when `pattern` occurs in the prompt
    pub fn add_error(&self, pattern: impl Into<String>, message: impl Into<String>) {
        self.state()
            .rules
            .push((pattern.into(), Reply::Error(message.into())));
    }

    /// Sleep for `delay` before replying when `pattern` occurs in the prompt
    pub fn add_delayed_response(
        &self,
        pattern: impl Into<String>,
        delay: Duration,
        response: impl Into<String>,
    ) {
        self.state()
            .rules
            .push((pattern.into(), Reply::Delayed(delay, response.into())));
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Number of requests whose prompt contained `pattern`
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|p| p.contains(pattern))
            .count()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Reset the call log
    pub fn reset_call_count(&self) {
        self.state().calls.clear();
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn route(&self, prompt: &str, system_prompt: Option<&str>) -> Reply {
        let mut state = self.state();
        state.calls.push(prompt.to_string());

        let system = system_prompt.unwrap_or_default();
        state
            .rules
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()) || system.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionService for MockProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        _config: &CompletionConfig,
    ) -> Result<String, Self::Error> {
        match self.route(prompt, system_prompt) {
            Reply::Text(text) => Ok(text),
            Reply::Error(message) => Err(LlmError::Mock(message)),
            Reply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}
