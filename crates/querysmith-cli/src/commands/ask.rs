//! Ask command implementation.

use crate::cli::AskArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use querysmith_domain::{CompletionService, SettingsStore};
use querysmith_llm::{CachedCompletion, HttpCompletionService};
use querysmith_pipeline::{Pipeline, PipelineResponse};
use querysmith_store::{snapshot, StoreError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Pipeline over the HTTP providers with response caching.
pub type HttpPipeline = Pipeline<CachedCompletion<HttpCompletionService>>;

/// Build the pipeline used by `ask` and the REPL.
pub fn build_pipeline() -> Result<HttpPipeline> {
    let service = HttpCompletionService::new()?;
    Ok(Pipeline::new(CachedCompletion::new(service)))
}

/// Execute the ask command.
pub async fn execute_ask<C, S>(
    args: AskArgs,
    api_key: Option<&str>,
    store: &S,
    pipeline: &Pipeline<C>,
    formatter: &Formatter,
) -> Result<()>
where
    C: CompletionService + 'static,
    S: SettingsStore<Error = StoreError>,
{
    let response = run_request(&args.request(), args.debug, api_key, store, pipeline).await?;
    let output = formatter.format_response(&response, args.all)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Run one request against a fresh snapshot of the stored settings.
///
/// Ctrl-C cancels the request and every branch still in flight.
pub async fn run_request<C, S>(
    text: &str,
    debug_logs: bool,
    api_key: Option<&str>,
    store: &S,
    pipeline: &Pipeline<C>,
) -> Result<PipelineResponse>
where
    C: CompletionService + 'static,
    S: SettingsStore<Error = StoreError>,
{
    let mut ctx = snapshot(store).await?;
    if let Some(key) = api_key {
        ctx.config.api_key = Some(key.to_string());
    }
    ctx.debug |= debug_logs;
    ctx.config.validate().map_err(CliError::Config)?;
    debug!(
        "Asking {} ({}) with {} example(s)",
        ctx.config.provider,
        ctx.config.model,
        ctx.corpus.len()
    );

    let token = CancellationToken::new();
    let canceller = token.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let result = pipeline
        .process_request_with_cancellation(text, Arc::new(ctx), token)
        .await;
    watcher.abort();

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use querysmith_domain::CompletionConfig;
    use querysmith_llm::MockProvider;
    use querysmith_pipeline::PipelineError;
    use querysmith_store::MemorySettingsStore;

    const INTENT: &str = r#"{
        "entities": {"companies": ["Acme"]},
        "analysisType": "search",
        "confidence": 0.9
    }"#;

    fn provider() -> MockProvider {
        let llm = MockProvider::new(r#"{"query": {"match": {"company_name": "Acme"}}}"#);
        llm.add_response("Extract structured intent", INTENT);
        llm
    }

    #[tokio::test]
    async fn test_run_request_uses_stored_settings() {
        let store = MemorySettingsStore::new();
        store.set_debug_flag(true).await.unwrap();
        let pipeline = Pipeline::new(provider());

        let response = run_request("jobs at Acme", false, None, &store, &pipeline)
            .await
            .unwrap();

        assert_eq!(response.best.unwrap().perspective.name, "Targeted Search");
        assert!(response.logs.is_some());
    }

    #[tokio::test]
    async fn test_debug_flag_from_arguments() {
        let store = MemorySettingsStore::new();
        let pipeline = Pipeline::new(provider());

        let quiet = run_request("jobs at Acme", false, None, &store, &pipeline)
            .await
            .unwrap();
        assert!(quiet.logs.is_none());

        let verbose = run_request("jobs at Acme", true, None, &store, &pipeline)
            .await
            .unwrap();
        assert!(verbose.logs.is_some());
    }

    #[tokio::test]
    async fn test_invalid_stored_config_rejected() {
        let store = MemorySettingsStore::new();
        store
            .set_config(&CompletionConfig {
                max_tokens: 0,
                ..CompletionConfig::default()
            })
            .await
            .unwrap();
        let llm = provider();
        let pipeline = Pipeline::new(llm.clone());

        let result = run_request("jobs", false, None, &store, &pipeline).await;

        assert!(matches!(result, Err(CliError::Config(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_surfaces() {
        let store = MemorySettingsStore::new();
        let llm = MockProvider::new("not json at all");
        let pipeline = Pipeline::new(llm);

        let result = run_request("jobs", false, None, &store, &pipeline).await;
        assert!(matches!(
            result,
            Err(CliError::Pipeline(PipelineError::Extraction(_)))
        ));
    }
}
