//! Deterministic query optimization rules

use crate::config::SynthesizerConfig;
use querysmith_domain::{
    AnalysisType, Complexity, EsQuery, Intent, SourceFilter, TrackTotalHits,
};

/// Apply size, timeout, projection and hit-tracking defaults for an intent
pub fn optimize_query(mut query: EsQuery, intent: &Intent, config: &SynthesizerConfig) -> EsQuery {
    let aggregation = intent.analysis_type == AnalysisType::Aggregation;

    if query.size.is_none() && !aggregation {
        query.size = Some(config.default_size);
    }

    if intent.complexity == Complexity::Complex && query.timeout.is_none() {
        query.timeout = Some(config.complex_timeout.clone());
    }

    if query.source.is_none() && intent.analysis_type == AnalysisType::Search {
        query.source = Some(SourceFilter::Fields(config.default_source_fields.clone()));
    }

    if aggregation {
        query.track_total_hits = Some(TrackTotalHits::Enabled(true));
        query.size = Some(0);
    }

    query
}
