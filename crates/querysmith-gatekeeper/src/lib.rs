//! Querysmith Gatekeeper
//!
//! Scores candidate queries before consensus.
//!
//! The gate is deliberately small: a query with a usable root clause scores
//! 80, anything else scores 20. Schema, performance and security checks
//! report diagnostics alongside the score.
//!
//! # Examples
//!
//! ```
//! use querysmith_domain::{EsQuery, Schema};
//! use querysmith_gatekeeper::{QueryValidator, ValidationConfig};
//! use serde_json::json;
//!
//! let validator = QueryValidator::new(&ValidationConfig::default());
//! let query = EsQuery::with_query(json!({"match": {"job_title": "engineer"}}));
//!
//! let result = validator.validate(&query, &Schema::default());
//! assert!(result.is_valid);
//! assert_eq!(result.score, 80.0);
//! ```

#![warn(missing_docs)]

mod checks;
mod config;
mod validator;

pub use checks::{
    default_checks, referenced_fields, Diagnostics, PerformanceCheck, QueryCheck,
    SchemaFieldCheck, SecurityCheck,
};
pub use config::ValidationConfig;
pub use validator::{QueryValidator, INVALID_SCORE, VALID_SCORE};
