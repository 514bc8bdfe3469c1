//! Validator configuration

use serde::{Deserialize, Serialize};

/// Configuration for validation rules
///
/// These switches only control which diagnostics are reported. The score is
/// decided by the structural gate alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report fields that are not in the index mapping
    pub check_schema_fields: bool,

    /// Report constructs that are likely to be slow
    pub check_performance: bool,

    /// Report scripting
    pub check_security: bool,

    /// Result window above which a performance warning is raised
    pub max_result_window: u64,

    /// Top-level fields never reported as unknown
    pub ignored_fields: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_schema_fields: true,
            check_performance: true,
            check_security: true,
            max_result_window: 10_000,
            ignored_fields: vec!["is_deleted".to_string(), "is_duplicate".to_string()],
        }
    }
}

impl ValidationConfig {
    /// Structural gate only, no extra diagnostics
    pub fn permissive() -> Self {
        Self {
            check_schema_fields: false,
            check_performance: false,
            check_security: false,
            ..Self::default()
        }
    }

    /// Every check enabled with a tighter result window
    pub fn strict() -> Self {
        Self {
            max_result_window: 1_000,
            ignored_fields: Vec::new(),
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
