//! Intent module - the structured reading of a free-text request

use serde::{Deserialize, Serialize};

/// What kind of answer the user is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    /// Retrieve matching documents
    #[default]
    Search,

    /// Count or bucket documents
    Aggregation,

    /// Statistical analysis over documents
    Analytics,
}

impl AnalysisType {
    /// Get the analysis type as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Search => "search",
            AnalysisType::Aggregation => "aggregation",
            AnalysisType::Analytics => "analytics",
        }
    }

    /// Parse an analysis type from its wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "search" => Some(AnalysisType::Search),
            "aggregation" => Some(AnalysisType::Aggregation),
            "analytics" => Some(AnalysisType::Analytics),
            _ => None,
        }
    }

    /// True for the two aggregate-style analysis types
    pub fn is_aggregate(&self) -> bool {
        matches!(self, AnalysisType::Aggregation | AnalysisType::Analytics)
    }
}

/// Rough size of the request: simple (1-2 criteria), medium (3-4), complex (5+ or aggregations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// One or two criteria
    #[default]
    Simple,

    /// Three or four criteria
    Medium,

    /// Five or more criteria, or aggregations
    Complex,
}

impl Complexity {
    /// Get the complexity as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }

    /// Parse a complexity from its wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Complexity::Simple),
            "medium" => Some(Complexity::Medium),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

/// Elasticsearch-style range bounds; values are date math or ISO dates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Greater than or equal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,

    /// Less than or equal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,

    /// Strictly greater than
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,

    /// Strictly less than
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
}

impl DateRange {
    /// True when no bound is set
    pub fn is_empty(&self) -> bool {
        self.gte.is_none() && self.lte.is_none() && self.gt.is_none() && self.lt.is_none()
    }
}

/// Salary bounds mentioned in the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// ISO currency code, if stated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Entities extracted from the request
///
/// Every list is present (possibly empty); absence is never represented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entities {
    /// Company names
    pub companies: Vec<String>,

    /// Locations
    pub locations: Vec<String>,

    /// Skills and technologies
    pub skills: Vec<String>,

    /// Job titles
    pub job_titles: Vec<String>,

    /// Date ranges
    pub date_ranges: Vec<DateRange>,

    /// Salary ranges
    pub salary_ranges: Vec<SalaryRange>,
}

impl Entities {
    /// True when no entity of any kind was extracted
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.locations.is_empty()
            && self.skills.is_empty()
            && self.job_titles.is_empty()
            && self.date_ranges.is_empty()
            && self.salary_ranges.is_empty()
    }
}

/// The normalized intent behind one request
///
/// Created once per request by the intent extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Extracted entities
    pub entities: Entities,

    /// Kind of answer requested
    pub analysis_type: AnalysisType,

    /// Request complexity
    pub complexity: Complexity,

    /// Extraction confidence in [0.0, 1.0]
    pub confidence: f64,

    /// The request text exactly as received
    pub raw_input: String,
}

impl Intent {
    /// Confidence used when the model gave none
    pub const DEFAULT_CONFIDENCE: f64 = 0.5;

    /// Create an intent with no entities for the given input
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self {
            entities: Entities::default(),
            analysis_type: AnalysisType::default(),
            complexity: Complexity::default(),
            confidence: Self::DEFAULT_CONFIDENCE,
            raw_input: raw_input.into(),
        }
    }

    /// Set the analysis type
    pub fn with_analysis_type(mut self, analysis_type: AnalysisType) -> Self {
        self.analysis_type = analysis_type;
        self
    }

    /// Set the complexity
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    /// Set the confidence, clamped to [0.0, 1.0]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }

    /// Replace the entities
    pub fn with_entities(mut self, entities: Entities) -> Self {
        self.entities = entities;
        self
    }
}

/// Clamp a value to [0.0, 1.0]; NaN maps to 0.0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_round_trip_strings() {
        for t in [AnalysisType::Search, AnalysisType::Aggregation, AnalysisType::Analytics] {
            assert_eq!(AnalysisType::parse(t.as_str()), Some(t));
        }
        assert_eq!(AnalysisType::parse("report"), None);
    }

    #[test]
    fn test_complexity_parse_is_case_sensitive() {
        assert_eq!(Complexity::parse("complex"), Some(Complexity::Complex));
        assert_eq!(Complexity::parse("Complex"), None);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Intent::new("x").with_confidence(1.7).confidence, 1.0);
        assert_eq!(Intent::new("x").with_confidence(-0.2).confidence, 0.0);
        assert_eq!(Intent::new("x").with_confidence(f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_intent_serializes_camel_case() {
        let mut entities = Entities::default();
        entities.job_titles.push("Software Engineer".to_string());
        let intent = Intent::new("find jobs")
            .with_entities(entities)
            .with_analysis_type(AnalysisType::Aggregation);

        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["analysisType"], "aggregation");
        assert_eq!(json["entities"]["jobTitles"][0], "Software Engineer");
        assert_eq!(json["rawInput"], "find jobs");
        assert!(json["entities"]["dateRanges"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_entity_lists_default_to_empty() {
        let entities: Entities = serde_json::from_str(r#"{"skills": ["Rust"]}"#).unwrap();
        assert_eq!(entities.skills, vec!["Rust"]);
        assert!(entities.companies.is_empty());
        assert!(entities.salary_ranges.is_empty());
    }
}
