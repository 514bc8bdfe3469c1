//! Candidate query documents

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `_source` projection: a field allow-list, a switch, or any other form the model produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceFilter {
    /// Explicit field list
    Fields(Vec<String>),

    /// `true` returns everything, `false` nothing
    Enabled(bool),

    /// Includes/excludes object or other shapes, kept verbatim
    Other(Value),
}

/// `track_total_hits`: a switch or a counting threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackTotalHits {
    /// `true` counts every hit, `false` skips counting
    Enabled(bool),

    /// Count accurately up to this many hits
    UpTo(u64),
}

impl From<bool> for TrackTotalHits {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

/// A search query document
///
/// The `query` clause is kept as raw JSON so whatever the model produced
/// survives untouched apart from the deterministic rewrites applied by the
/// synthesizer. Unknown top-level keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsQuery {
    /// Root query clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,

    /// Result window size
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<u64>,

    /// Result window offset
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<u64>,

    /// Field projection
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,

    /// Aggregations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggs: Option<Value>,

    /// Sort specification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,

    /// Hit counting mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<TrackTotalHits>,

    /// Search timeout, e.g. "30s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Any other top-level keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EsQuery {
    /// Create a query document around a root clause
    pub fn with_query(query: Value) -> Self {
        Self {
            query: Some(query),
            ..Self::default()
        }
    }

    /// The root clause, when it is a non-empty JSON object
    pub fn root_clause(&self) -> Option<&Map<String, Value>> {
        match &self.query {
            Some(Value::Object(map)) if !map.is_empty() => Some(map),
            _ => None,
        }
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Accept a count written as an integer, an integral float (`10.0`) or a
/// numeric string (`"10"`).
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<Value>::deserialize(deserializer)?;
    let count = match &value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    match count {
        Some(count) => Ok(Some(count)),
        None => Err(D::Error::custom(format!(
            "expected a non-negative count, got {}",
            value.unwrap_or(Value::Null)
        ))),
    }
}
