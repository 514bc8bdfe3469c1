//! Request coordination
//!
//! Runs one request through extraction, perspective generation, concurrent
//! synthesis and validation, and consensus.

use crate::config::PipelineConfig;
use crate::consensus::select_best;
use crate::error::{PipelineError, Result};
use crate::perspectives::generate_perspectives;
use querysmith_domain::{
    AgentLog, CompletionService, Intent, Perspective, QueryResult, RequestContext, SessionLog,
};
use querysmith_extractor::IntentExtractor;
use querysmith_gatekeeper::QueryValidator;
use querysmith_synthesizer::{QuerySynthesizer, SynthesisError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Agent name recorded for branch failures
pub const AGENT_NAME: &str = "AgentOrchestrator";

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has run yet
    Start,
    /// Intent is available
    IntentExtracted,
    /// Perspectives are ranked
    PerspectivesGenerated,
    /// Branches are running
    BuildingCandidates,
    /// Every branch has resolved
    Consolidated,
    /// Response assembled
    Done,
    /// Extraction failed or the request was cancelled
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::IntentExtracted => "intent_extracted",
            Stage::PerspectivesGenerated => "perspectives_generated",
            Stage::BuildingCandidates => "building_candidates",
            Stage::Consolidated => "consolidated",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    /// Every surviving candidate, in perspective order
    pub candidates: Vec<QueryResult>,

    /// The consensus choice, `None` when no branch survived
    pub best: Option<QueryResult>,

    /// Full session log, present only for debug requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<AgentLog>>,
}

/// What one branch hands back to the coordinator
struct BranchOutcome {
    index: usize,
    result: std::result::Result<QueryResult, SynthesisError>,
    trail: SessionLog,
}

/// Multi-perspective query synthesis pipeline
///
/// Holds no per-request state; every call takes its own context snapshot, so
/// one pipeline can serve concurrent requests.
pub struct Pipeline<C> {
    extractor: IntentExtractor<Arc<C>>,
    synthesizer: Arc<QuerySynthesizer<Arc<C>>>,
    validator: Arc<QueryValidator>,
}

impl<C: CompletionService + 'static> Pipeline<C> {
    /// Create a pipeline with default stage configuration
    pub fn new(service: C) -> Self {
        let service = Arc::new(service);
        Self {
            extractor: IntentExtractor::new(Arc::clone(&service)),
            synthesizer: Arc::new(QuerySynthesizer::new(service)),
            validator: Arc::new(QueryValidator::default()),
        }
    }

    /// Create a pipeline with custom stage configuration
    pub fn with_config(service: C, config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(PipelineError::Config)?;
        let service = Arc::new(service);

        let extractor = IntentExtractor::with_config(Arc::clone(&service), config.extractor)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let synthesizer = QuerySynthesizer::with_config(service, config.synthesizer)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        Ok(Self {
            extractor,
            synthesizer: Arc::new(synthesizer),
            validator: Arc::new(QueryValidator::new(&config.validation)),
        })
    }

    /// Replace the validator, e.g. to register extra checks
    pub fn with_validator(mut self, validator: QueryValidator) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Process one request
    ///
    /// Fails only when intent extraction fails.
    pub async fn process_request(
        &self,
        text: &str,
        ctx: Arc<RequestContext>,
    ) -> Result<PipelineResponse> {
        self.process_request_with_cancellation(text, ctx, CancellationToken::new())
            .await
    }

    /// Process one request, abandoning it when `token` is cancelled
    ///
    /// Cancellation aborts every outstanding branch and returns
    /// [`PipelineError::Cancelled`].
    pub async fn process_request_with_cancellation(
        &self,
        text: &str,
        ctx: Arc<RequestContext>,
        token: CancellationToken,
    ) -> Result<PipelineResponse> {
        let mut log = SessionLog::new();
        debug!(stage = %Stage::Start, "Processing request ({} chars)", text.len());

        let extracted = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.extractor.extract(text, &ctx, &mut log) => Some(result),
        };
        let intent = match extracted {
            Some(Ok(intent)) => intent,
            Some(Err(e)) => {
                warn!(stage = %Stage::Failed, "Intent extraction failed: {}", e);
                return Err(e.into());
            }
            None => {
                info!(stage = %Stage::Failed, "Request cancelled during extraction");
                return Err(PipelineError::Cancelled);
            }
        };
        debug!(stage = %Stage::IntentExtracted, "Intent: {:?}", intent.analysis_type);

        let perspectives = generate_perspectives(&intent);
        log.push(AgentLog::instant(
            "PerspectiveAgent",
            "generatePerspectives",
            json!({ "analysisType": intent.analysis_type }),
            json!({
                "perspectives": perspectives.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
            }),
        ));
        debug!(
            stage = %Stage::PerspectivesGenerated,
            "Generated {} perspective(s)",
            perspectives.len()
        );

        let outcomes = self
            .run_branches(Arc::new(intent), &perspectives, &ctx, &token)
            .await?;

        let mut candidates = Vec::with_capacity(perspectives.len());
        for (perspective, outcome) in perspectives.iter().zip(outcomes) {
            match outcome {
                Some(outcome) => {
                    log.append(outcome.trail);
                    if let Ok(result) = outcome.result {
                        candidates.push(result);
                    }
                }
                None => {
                    warn!("Branch '{}' did not complete", perspective.name);
                    let entry = AgentLog::start(
                        AGENT_NAME,
                        branch_action(perspective),
                        branch_input(perspective),
                    );
                    log.push(entry.fail("branch task aborted"));
                }
            }
        }
        debug!(
            stage = %Stage::Consolidated,
            "{} of {} branch(es) produced a candidate",
            candidates.len(),
            perspectives.len()
        );

        let best = select_best(&candidates, &mut log);
        info!(
            stage = %Stage::Done,
            "Request produced {} candidate(s), best: {}",
            candidates.len(),
            best.as_ref().map(|b| b.perspective.name.as_str()).unwrap_or("none")
        );

        Ok(PipelineResponse {
            candidates,
            best,
            logs: ctx.debug.then(|| log.into_entries()),
        })
    }

    /// Fan out one task per perspective and wait for all of them
    ///
    /// Slot `i` holds the outcome of `perspectives[i]`, or `None` if its task
    /// panicked.
    async fn run_branches(
        &self,
        intent: Arc<Intent>,
        perspectives: &[Perspective],
        ctx: &Arc<RequestContext>,
        token: &CancellationToken,
    ) -> Result<Vec<Option<BranchOutcome>>> {
        debug!(stage = %Stage::BuildingCandidates, "Starting {} branch(es)", perspectives.len());

        let mut branches = JoinSet::new();
        for (index, perspective) in perspectives.iter().cloned().enumerate() {
            let synthesizer = Arc::clone(&self.synthesizer);
            let validator = Arc::clone(&self.validator);
            let intent = Arc::clone(&intent);
            let ctx = Arc::clone(ctx);

            branches.spawn(async move {
                let mut trail = SessionLog::new();
                let result = run_branch(
                    &synthesizer,
                    &validator,
                    &intent,
                    perspective,
                    &ctx,
                    &mut trail,
                )
                .await;
                BranchOutcome {
                    index,
                    result,
                    trail,
                }
            });
        }

        let mut outcomes: Vec<Option<BranchOutcome>> =
            std::iter::repeat_with(|| None).take(perspectives.len()).collect();

        loop {
            let joined = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    branches.abort_all();
                    info!(stage = %Stage::Failed, "Request cancelled with branches in flight");
                    return Err(PipelineError::Cancelled);
                }
                joined = branches.join_next() => joined,
            };

            match joined {
                Some(Ok(outcome)) => {
                    let index = outcome.index;
                    if let Some(slot) = outcomes.get_mut(index) {
                        *slot = Some(outcome);
                    }
                }
                Some(Err(e)) => warn!("Branch task failed: {}", e),
                None => break,
            }
        }

        Ok(outcomes)
    }
}

fn branch_action(perspective: &Perspective) -> String {
    format!("processPerspective-{}", perspective.name)
}

fn branch_input(perspective: &Perspective) -> serde_json::Value {
    json!({ "perspectiveId": perspective.id, "perspective": perspective })
}

/// Synthesize and validate one perspective
///
/// On failure the trail gets the synthesizer's entry plus an orchestrator
/// entry naming the perspective.
async fn run_branch<C: CompletionService>(
    synthesizer: &QuerySynthesizer<C>,
    validator: &QueryValidator,
    intent: &Intent,
    perspective: Perspective,
    ctx: &RequestContext,
    trail: &mut SessionLog,
) -> std::result::Result<QueryResult, SynthesisError> {
    let pending = AgentLog::start(
        AGENT_NAME,
        branch_action(&perspective),
        branch_input(&perspective),
    );

    let query = match synthesizer.build(intent, &perspective, ctx, trail).await {
        Ok(query) => query,
        Err(e) => {
            warn!("Dropping perspective '{}': {}", perspective.name, e);
            trail.push(pending.fail(&e));
            return Err(e);
        }
    };

    let validation = validator.validate(&query, &ctx.schema);
    debug!("Perspective '{}' scored {}", perspective.name, validation.score);

    Ok(QueryResult::new(
        query,
        perspective,
        validation,
        trail.entries().to_vec(),
    ))
}
