//! Pipeline configuration

use querysmith_extractor::ExtractorConfig;
use querysmith_gatekeeper::ValidationConfig;
use querysmith_synthesizer::SynthesizerConfig;
use serde::{Deserialize, Serialize};

/// Tunables for every stage of the pipeline
///
/// Serialized as one TOML document with a table per stage:
///
/// ```toml
/// [extractor]
/// example_limit = 3
///
/// [synthesizer]
/// default_size = 50
///
/// [validation]
/// check_security = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Intent extraction
    pub extractor: ExtractorConfig,

    /// Query synthesis
    pub synthesizer: SynthesizerConfig,

    /// Candidate validation
    pub validation: ValidationConfig,
}

impl PipelineConfig {
    /// Validate every stage's configuration
    pub fn validate(&self) -> Result<(), String> {
        self.extractor.validate()?;
        self.synthesizer.validate()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            [synthesizer]
            default_size = 25

            [validation]
            check_performance = false
            "#,
        )
        .unwrap();

        assert_eq!(config.synthesizer.default_size, 25);
        assert!(!config.validation.check_performance);
        assert_eq!(config.extractor, ExtractorConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_stage_config_rejected() {
        let mut config = PipelineConfig::default();
        config.synthesizer.default_size = 0;
        assert!(config.validate().is_err());
    }
}
