//! Configuration for the query synthesizer

use serde::{Deserialize, Serialize};

/// Configuration for the query synthesizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Maximum corpus examples included in the prompt
    pub example_limit: usize,

    /// Result window applied to non-aggregation queries without one
    pub default_size: u64,

    /// Search timeout applied to complex queries without one
    pub complex_timeout: String,

    /// `_source` projection applied to search queries without one
    pub default_source_fields: Vec<String>,
}

impl SynthesizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_size == 0 {
            return Err("default_size must be greater than 0".to_string());
        }
        if self.complex_timeout.trim().is_empty() {
            return Err("complex_timeout must not be empty".to_string());
        }
        if self.default_source_fields.iter().any(|f| f.trim().is_empty()) {
            return Err("default_source_fields must not contain empty names".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            example_limit: 3,
            default_size: 50,
            complex_timeout: "30s".to_string(),
            default_source_fields: [
                "job_title",
                "company_name",
                "location",
                "raw_salary",
                "posted_date",
                "url",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        }
    }
}
