//! Candidate query validation

use crate::checks::{default_checks, Diagnostics, QueryCheck};
use crate::config::ValidationConfig;
use querysmith_domain::{EsQuery, Schema, ValidationResult};
use tracing::debug;

/// Score of a query with a usable root clause
pub const VALID_SCORE: f64 = 80.0;

/// Score of a query without one
pub const INVALID_SCORE: f64 = 20.0;

const MISSING_ROOT: &str = "Basic syntax error: query object missing or malformed.";
const GENERIC_ADVICE: &str = "Consider adding more specific filters.";
const FLAWED_ADVICE: &str = "Query is fundamentally flawed.";

/// Deterministic validator for candidate queries
///
/// The structural gate decides validity and score. Registered checks add
/// diagnostics on top without changing either.
pub struct QueryValidator {
    checks: Vec<Box<dyn QueryCheck>>,
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl QueryValidator {
    /// Create a validator with the built-in checks the configuration enables
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            checks: default_checks(config),
        }
    }

    /// Structural gate only
    pub fn baseline() -> Self {
        Self { checks: Vec::new() }
    }

    /// Register an additional check
    pub fn with_check(mut self, check: impl QueryCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of the registered checks, in run order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Validate one candidate against the schema
    pub fn validate(&self, query: &EsQuery, schema: &Schema) -> ValidationResult {
        let mut result = if query.root_clause().is_some() {
            ValidationResult {
                is_valid: true,
                score: VALID_SCORE,
                ..ValidationResult::default()
            }
        } else {
            ValidationResult {
                is_valid: false,
                syntax_errors: vec![MISSING_ROOT.to_string()],
                score: INVALID_SCORE,
                ..ValidationResult::default()
            }
        };

        {
            let mut diagnostics = Diagnostics::new(&mut result);
            for check in &self.checks {
                check.check(query, schema, &mut diagnostics);
            }
        }

        result.recommendations.push(if result.is_valid {
            GENERIC_ADVICE.to_string()
        } else {
            FLAWED_ADVICE.to_string()
        });

        debug!(
            "Validated query: valid={} score={} issues={}",
            result.is_valid,
            result.score,
            result.issue_count()
        );
        result
    }
}
