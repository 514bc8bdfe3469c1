//! Parse model output into an intent
//!
//! The model is asked for a bare JSON object. Whatever comes back is coerced
//! into the intent invariants rather than rejected: wrong-typed lists become
//! empty, non-string members are dropped, unknown enum values fall back to
//! their defaults and confidence is clamped.

use crate::error::ExtractorError;
use crate::normalize::{normalize_company, normalize_skill};
use querysmith_domain::{
    AnalysisType, Complexity, DateRange, Entities, Intent, SalaryRange,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse a model response into a normalized intent
pub fn parse_intent_response(response: &str, raw_input: &str) -> Result<Intent, ExtractorError> {
    let object = extract_json_object(response)?;
    Ok(coerce_intent(&object, raw_input))
}

/// Extract a JSON object from the response, handling markdown code blocks
pub fn extract_json_object(response: &str) -> Result<Map<String, Value>, ExtractorError> {
    let trimmed = response.trim();

    let candidate = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(_) => {
            let fenced = fenced_block(trimmed).ok_or_else(|| {
                ExtractorError::InvalidFormat("response is not JSON".to_string())
            })?;
            serde_json::from_str(fenced)
                .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?
        }
    };

    match candidate {
        Value::Object(map) => Ok(map),
        other => Err(ExtractorError::InvalidFormat(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

/// Contents of the first markdown code block, with or without a language tag
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_ticks = &text[start + 3..];
    let body_start = after_ticks.find('\n')? + 1;
    let body = &after_ticks[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce a loosely-shaped object into the intent invariants
pub fn coerce_intent(object: &Map<String, Value>, raw_input: &str) -> Intent {
    let empty = Map::new();
    let entities = object
        .get("entities")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let entities = Entities {
        companies: string_list(entities.get("companies"))
            .into_iter()
            .map(normalize_company)
            .collect(),
        locations: string_list(entities.get("locations")),
        skills: string_list(entities.get("skills"))
            .into_iter()
            .map(normalize_skill)
            .collect(),
        job_titles: string_list(entities.get("jobTitles")),
        date_ranges: object_list(entities.get("dateRanges"))
            .filter_map(date_range)
            .collect(),
        salary_ranges: object_list(entities.get("salaryRanges"))
            .filter_map(salary_range)
            .collect(),
    };

    let analysis_type = object
        .get("analysisType")
        .and_then(Value::as_str)
        .and_then(AnalysisType::parse)
        .unwrap_or_default();

    let complexity = object
        .get("complexity")
        .and_then(Value::as_str)
        .and_then(Complexity::parse)
        .unwrap_or_default();

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(Intent::DEFAULT_CONFIDENCE);

    debug!(
        "Coerced intent: {} analysis, {} complexity, confidence {:.2}",
        analysis_type.as_str(),
        complexity.as_str(),
        confidence
    );

    Intent::new(raw_input)
        .with_entities(entities)
        .with_analysis_type(analysis_type)
        .with_complexity(complexity)
        .with_confidence(confidence)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn object_list(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn bound(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn date_range(map: &Map<String, Value>) -> Option<DateRange> {
    let range = DateRange {
        gte: bound(map, "gte"),
        lte: bound(map, "lte"),
        gt: bound(map, "gt"),
        lt: bound(map, "lt"),
    };
    (!range.is_empty()).then_some(range)
}

fn salary_range(map: &Map<String, Value>) -> Option<SalaryRange> {
    let min = map.get("min").and_then(Value::as_f64);
    let max = map.get("max").and_then(Value::as_f64);
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(SalaryRange {
        min,
        max,
        currency: map
            .get("currency")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{
            "entities": {
                "companies": [],
                "locations": ["San Francisco"],
                "skills": ["JavaScript"],
                "jobTitles": ["Software Engineer"],
                "dateRanges": [],
                "salaryRanges": []
            },
            "analysisType": "search",
            "complexity": "simple",
            "confidence": 0.9
        }"#;

        let intent = parse_intent_response(response, "raw").unwrap();
        assert_eq!(intent.entities.job_titles, vec!["Software Engineer"]);
        assert_eq!(intent.entities.locations, vec!["San Francisco"]);
        assert_eq!(intent.analysis_type, AnalysisType::Search);
        assert_eq!(intent.confidence, 0.9);
        assert_eq!(intent.raw_input, "raw");
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "Here you go:\n```json\n{\"analysisType\": \"aggregation\"}\n```\n";
        let intent = parse_intent_response(response, "x").unwrap();
        assert_eq!(intent.analysis_type, AnalysisType::Aggregation);
    }

    #[test]
    fn test_parse_markdown_without_language() {
        let response = "```\n{\"complexity\": \"complex\"}\n```";
        let intent = parse_intent_response(response, "x").unwrap();
        assert_eq!(intent.complexity, Complexity::Complex);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_intent_response("This is not JSON", "x");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_json_not_object() {
        let result = parse_intent_response("[1, 2]", "x");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_coerce_wrong_types() {
        let response = r#"{
            "entities": {
                "companies": "Google",
                "skills": ["js", 42, null, "  ", "Rust"],
                "dateRanges": [{"gte": "now-30d"}, "last month", {}],
                "salaryRanges": [{"min": 100000, "currency": "USD"}, {"currency": "EUR"}]
            },
            "analysisType": "report",
            "complexity": 3,
            "confidence": "high"
        }"#;

        let intent = parse_intent_response(response, "x").unwrap();
        assert!(intent.entities.companies.is_empty());
        assert_eq!(intent.entities.skills, vec!["JavaScript", "Rust"]);
        assert_eq!(intent.entities.date_ranges.len(), 1);
        assert_eq!(intent.entities.date_ranges[0].gte.as_deref(), Some("now-30d"));
        assert_eq!(intent.entities.salary_ranges.len(), 1);
        assert_eq!(intent.entities.salary_ranges[0].currency.as_deref(), Some("USD"));
        assert_eq!(intent.analysis_type, AnalysisType::Search);
        assert_eq!(intent.complexity, Complexity::Simple);
        assert_eq!(intent.confidence, 0.5);
    }

    #[test]
    fn test_coerce_missing_entities() {
        let intent = parse_intent_response("{}", "x").unwrap();
        assert!(intent.entities.is_empty());
        assert_eq!(intent.confidence, Intent::DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_confidence_clamped() {
        let high = parse_intent_response(r#"{"confidence": 3.2}"#, "x").unwrap();
        let low = parse_intent_response(r#"{"confidence": -1}"#, "x").unwrap();
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_company_normalization_applied() {
        let response = r#"{"entities": {"companies": ["facebook", "Acme Corp"]}}"#;
        let intent = parse_intent_response(response, "x").unwrap();
        assert_eq!(intent.entities.companies, vec!["Meta", "Acme Corp"]);
    }
}
