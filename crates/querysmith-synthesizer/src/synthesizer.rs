//! Core query synthesizer implementation

use crate::config::SynthesizerConfig;
use crate::error::SynthesisError;
use crate::examples::select_similar;
use crate::filters::enforce_mandatory_filters;
use crate::optimize::optimize_query;
use crate::parser::extract_query_object;
use crate::prompt::QueryPromptBuilder;
use querysmith_domain::{
    AgentLog, CompletionService, EsQuery, Intent, Perspective, RequestContext, SessionLog,
};
use querysmith_llm::complete_with_retry;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Agent name recorded in the session log
pub const AGENT_NAME: &str = "QueryBuilder";

/// Builds one candidate query per perspective
pub struct QuerySynthesizer<C> {
    service: C,
    config: SynthesizerConfig,
}

impl<C: CompletionService> QuerySynthesizer<C> {
    /// Create a synthesizer with the default configuration
    pub fn new(service: C) -> Self {
        Self {
            service,
            config: SynthesizerConfig::default(),
        }
    }

    /// Create a synthesizer with a custom configuration
    pub fn with_config(service: C, config: SynthesizerConfig) -> Result<Self, SynthesisError> {
        config.validate().map_err(SynthesisError::Config)?;
        Ok(Self { service, config })
    }

    /// Active configuration
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Build the candidate query for one perspective
    ///
    /// Appends exactly one `QueryBuilder/buildQuery` entry to `log`.
    pub async fn build(
        &self,
        intent: &Intent,
        perspective: &Perspective,
        ctx: &RequestContext,
        log: &mut SessionLog,
    ) -> Result<EsQuery, SynthesisError> {
        let pending = AgentLog::start(
            AGENT_NAME,
            "buildQuery",
            json!({ "intent": intent, "perspective": perspective }),
        );

        match self.build_inner(intent, perspective, ctx).await {
            Ok(query) => {
                log.push(pending.succeed(query.to_value()));
                Ok(query)
            }
            Err(e) => {
                warn!("Query building failed for '{}': {}", perspective.name, e);
                log.push(pending.fail(&e));
                Err(e)
            }
        }
    }

    async fn build_inner(
        &self,
        intent: &Intent,
        perspective: &Perspective,
        ctx: &RequestContext,
    ) -> Result<EsQuery, SynthesisError> {
        let examples = select_similar(intent, perspective, &ctx.corpus, self.config.example_limit);
        let system_prompt = QueryPromptBuilder::system_prompt(&ctx.schema)?;
        let prompt = QueryPromptBuilder::new(intent, perspective)
            .with_examples(examples)
            .build()?;

        debug!(
            "Building query for '{}' ({} chars of prompt)",
            perspective.name,
            prompt.len() + system_prompt.len()
        );

        let response =
            complete_with_retry(&self.service, &prompt, Some(&system_prompt), &ctx.config).await?;

        let object = extract_query_object(&response)?;
        let draft: EsQuery = serde_json::from_value(Value::Object(object))
            .map_err(|e| SynthesisError::InvalidQuery(e.to_string()))?;

        let query = optimize_query(enforce_mandatory_filters(draft), intent, &self.config);

        info!("Built query for perspective '{}'", perspective.name);
        Ok(query)
    }
}
