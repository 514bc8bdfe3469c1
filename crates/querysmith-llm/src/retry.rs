//! Timeout and retry around a single completion
//!
//! Every attempt is bounded by `config.timeout`. A failed or timed-out attempt
//! is retried with the identical prompt until `1 + config.retry_attempts`
//! attempts have been made.

use crate::LlmError;
use querysmith_domain::{CompletionConfig, CompletionService};
use std::time::Duration;
use tracing::{debug, warn};

/// Base delay between attempts; doubles after each failure
pub const RETRY_BASE_DELAY_MS: u64 = 200;

/// Run a completion with the configured timeout and retry budget
pub async fn complete_with_retry<C>(
    service: &C,
    prompt: &str,
    system_prompt: Option<&str>,
    config: &CompletionConfig,
) -> Result<String, LlmError>
where
    C: CompletionService + ?Sized,
{
    let attempts = config.total_attempts();
    let mut last_error = None;

    for attempt in 1..=attempts {
        debug!(
            "Completion attempt {}/{} ({}/{})",
            attempt, attempts, config.provider, config.model
        );

        let outcome = tokio::time::timeout(
            config.timeout(),
            service.complete(prompt, system_prompt, config),
        )
        .await;

        let error = match outcome {
            Ok(Ok(text)) => return Ok(text),
            Ok(Err(e)) => LlmError::Service(Box::new(e)),
            Err(_) => LlmError::Timeout(config.timeout),
        };

        warn!("Completion attempt {}/{} failed: {}", attempt, attempts, error);
        last_error = Some(error);

        if attempt < attempts {
            let delay = RETRY_BASE_DELAY_MS.saturating_mul(1 << (attempt - 1).min(16));
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    let last = last_error.unwrap_or_else(|| LlmError::Communication("no attempt made".to_string()));
    Err(LlmError::Exhausted {
        attempts,
        last: Box::new(last),
    })
}
