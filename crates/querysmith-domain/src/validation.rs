//! Validation outcome for one candidate query

use serde::{Deserialize, Serialize};

/// Diagnostics and score produced by the query validator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationResult {
    /// Whether the query passed the structural gate
    pub is_valid: bool,

    /// Malformed structure
    pub syntax_errors: Vec<String>,

    /// Fields or types that do not match the index schema
    pub schema_errors: Vec<String>,

    /// Constructs likely to be slow
    pub performance_warnings: Vec<String>,

    /// Injection or scripting concerns
    pub security_issues: Vec<String>,

    /// Overall score, higher is better
    pub score: f64,

    /// Suggested improvements
    pub recommendations: Vec<String>,
}

impl ValidationResult {
    /// Total number of reported problems across all categories
    pub fn issue_count(&self) -> usize {
        self.syntax_errors.len()
            + self.schema_errors.len()
            + self.performance_warnings.len()
            + self.security_issues.len()
    }
}
