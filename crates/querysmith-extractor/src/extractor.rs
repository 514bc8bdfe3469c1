//! Core intent extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_intent_response;
use crate::prompt::{select_examples, IntentPromptBuilder};
use querysmith_domain::{AgentLog, CompletionService, Intent, RequestContext, SessionLog};
use querysmith_llm::complete_with_retry;
use serde_json::json;
use tracing::{debug, info, warn};

/// Agent name recorded in the session log
pub const AGENT_NAME: &str = "IntentParser";

/// The intent extractor turns free text into a normalized [`Intent`]
pub struct IntentExtractor<C> {
    service: C,
    config: ExtractorConfig,
}

impl<C: CompletionService> IntentExtractor<C> {
    /// Create an extractor with the default configuration
    pub fn new(service: C) -> Self {
        Self {
            service,
            config: ExtractorConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(service: C, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { service, config })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the intent behind `user_input`
    ///
    /// Appends exactly one `IntentParser/parse` entry to `log`, on success and
    /// on failure.
    pub async fn extract(
        &self,
        user_input: &str,
        ctx: &RequestContext,
        log: &mut SessionLog,
    ) -> Result<Intent, ExtractorError> {
        let pending = AgentLog::start(AGENT_NAME, "parse", json!({ "userInput": user_input }));

        match self.extract_inner(user_input, ctx).await {
            Ok(intent) => {
                log.push(pending.succeed(serde_json::to_value(&intent).unwrap_or_default()));
                Ok(intent)
            }
            Err(e) => {
                warn!("Intent extraction failed: {}", e);
                log.push(pending.fail(&e));
                Err(e)
            }
        }
    }

    async fn extract_inner(
        &self,
        user_input: &str,
        ctx: &RequestContext,
    ) -> Result<Intent, ExtractorError> {
        let length = user_input.chars().count();
        if user_input.trim().is_empty() {
            return Err(ExtractorError::EmptyInput);
        }
        if length > self.config.max_input_length {
            return Err(ExtractorError::InputTooLong(length, self.config.max_input_length));
        }

        info!("Extracting intent from request ({} chars)", length);

        let examples = select_examples(user_input, &ctx.corpus, self.config.example_limit);
        let system_prompt = IntentPromptBuilder::system_prompt(&ctx.schema)?;
        let prompt = IntentPromptBuilder::new(user_input)
            .with_examples(examples)
            .build();

        debug!("Prompt length: {} chars", prompt.len() + system_prompt.len());

        let response =
            complete_with_retry(&self.service, &prompt, Some(&system_prompt), &ctx.config).await?;

        debug!("LLM response length: {} chars", response.len());

        let intent = parse_intent_response(&response, user_input)?;

        info!(
            "Intent extracted: {} / {} (confidence {:.2})",
            intent.analysis_type.as_str(),
            intent.complexity.as_str(),
            intent.confidence
        );

        Ok(intent)
    }
}
