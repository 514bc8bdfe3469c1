//! Query results - one per surviving perspective

use crate::{AgentLog, EsQuery, Perspective, ValidationResult};
use serde::{Deserialize, Serialize};

/// Rough performance estimate attached to a result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Measured execution time in milliseconds, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,

    /// Measured memory usage in bytes, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<u64>,

    /// Complexity estimate
    pub complexity_score: u32,

    /// Suggestions for making the query cheaper
    #[serde(default)]
    pub optimization_suggestions: Vec<String>,
}

/// A validated candidate query together with how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// The candidate query
    pub query: EsQuery,

    /// Perspective that produced it
    pub perspective: Perspective,

    /// Validator verdict
    pub validation: ValidationResult,

    /// Human-readable rationale
    pub reasoning: String,

    /// Complexity estimate
    pub complexity: u32,

    /// Performance estimate
    pub estimated_performance: PerformanceMetrics,

    /// Log trail of the branch that produced this result
    #[serde(default)]
    pub agent_logs: Vec<AgentLog>,
}

impl QueryResult {
    /// Assemble a result from a branch's outputs
    pub fn new(
        query: EsQuery,
        perspective: Perspective,
        validation: ValidationResult,
        agent_logs: Vec<AgentLog>,
    ) -> Self {
        let reasoning = format!(
            "Query built based on {} perspective. {}",
            perspective.name, perspective.reasoning
        );
        let complexity = perspective.estimated_complexity;
        let estimated_performance = PerformanceMetrics {
            execution_time: None,
            memory_usage: None,
            complexity_score: complexity,
            optimization_suggestions: validation.recommendations.clone(),
        };

        Self {
            query,
            perspective,
            validation,
            reasoning,
            complexity,
            estimated_performance,
            agent_logs,
        }
    }
}
