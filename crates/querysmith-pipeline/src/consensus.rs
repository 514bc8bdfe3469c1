//! Consensus selection across candidate queries

use querysmith_domain::{AgentLog, QueryResult, SessionLog};
use serde_json::json;
use std::cmp::Ordering;
use tracing::info;

/// Agent name recorded in the session log
pub const AGENT_NAME: &str = "ConsensusAgent";

/// Ranking order: higher validation score first, then higher perspective confidence
pub fn compare_candidates(a: &QueryResult, b: &QueryResult) -> Ordering {
    b.validation
        .score
        .total_cmp(&a.validation.score)
        .then_with(|| b.perspective.confidence.total_cmp(&a.perspective.confidence))
}

/// Pick the best candidate
///
/// Returns `None` for an empty slice. Ties keep input order, so the same
/// input always yields the same choice. Appends one
/// `ConsensusAgent/selectBestQuery` entry when a candidate is chosen.
pub fn select_best(candidates: &[QueryResult], log: &mut SessionLog) -> Option<QueryResult> {
    let best = candidates.iter().min_by(|a, b| compare_candidates(a, b))?;

    info!(
        "Selected '{}' (score {}) from {} candidate(s)",
        best.perspective.name,
        best.validation.score,
        candidates.len()
    );

    log.push(AgentLog::instant(
        AGENT_NAME,
        "selectBestQuery",
        json!({ "queryResultsCount": candidates.len() }),
        json!({
            "bestResultId": best.perspective.id,
            "bestResultScore": best.validation.score,
        }),
    ));

    Some(best.clone())
}
